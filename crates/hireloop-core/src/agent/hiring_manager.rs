//! The hiring manager agent.
//!
//! Every inbound message enters through [`HiringManager::handle`]. Admin
//! requests go to the registry; turns pass the gate, advance the session and
//! the generated reply is delivered to the applicant's route. The value
//! returned from `handle` is the reply to whoever sent the message.

use std::sync::Arc;

use hireloop_types::config::HIRING_MANAGER_AGENT_ID;
use hireloop_types::error::InterviewError;
use hireloop_types::inbound::{AdminRequest, ApplicantIdentity, InboundMessage, TurnRequest};
use hireloop_types::interview::{ConversationRecord, HandlerReply};
use serde::Serialize;
use tracing::{info, warn};

use crate::delivery::Delivery;
use crate::interview::gate::{AccessGate, UNREGISTERED_APPLICANT};
use crate::interview::responder::Responder;
use crate::interview::session::SessionMachine;
use crate::storage::archive::EvaluationArchive;
use crate::storage::kv_store::KvStore;

/// Reply text for a successful admin action.
pub const ADMIN_SUCCESS: &str = "Success.";

/// Reply text for a turn that did not end the interview.
pub const TURN_CONTINUES: &str = "Success, interview is not over.";

/// Greeting shown to someone opening the hiring manager directly.
#[derive(Debug, Clone, Serialize)]
pub struct Welcome {
    pub welcome: String,
    /// A ready-to-edit admin request registering the example applicant.
    pub example: serde_json::Value,
}

impl Welcome {
    pub fn for_applicant(example_applicant: &ApplicantIdentity) -> Self {
        Self {
            welcome: "Welcome to the hiring manager. Admins can register or unregister \
                      applicants by sending the request below with their admin key. \
                      Applicants cannot talk to this agent directly."
                .to_string(),
            example: serde_json::json!({
                "kind": "admin",
                "applicantName": example_applicant.name,
                "applicantKey": example_applicant.key,
                "adminKey": "<ADMIN_KEY>",
                "action": "register",
            }),
        }
    }
}

pub struct HiringManager<S, R, A, D> {
    gate: AccessGate<S>,
    sessions: SessionMachine<S, R, A>,
    delivery: Arc<D>,
}

impl<S, R, A, D> HiringManager<S, R, A, D>
where
    S: KvStore,
    R: Responder,
    A: EvaluationArchive,
    D: Delivery,
{
    pub fn new(gate: AccessGate<S>, sessions: SessionMachine<S, R, A>, delivery: Arc<D>) -> Self {
        Self {
            gate,
            sessions,
            delivery,
        }
    }

    /// Parse a raw JSON payload and handle it.
    pub async fn handle_value(
        &self,
        value: serde_json::Value,
    ) -> Result<HandlerReply, InterviewError> {
        let message = InboundMessage::from_value(value).inspect_err(|e| {
            info!(error = %e, "rejected unparseable message");
        })?;
        self.handle(message).await
    }

    pub async fn handle(&self, message: InboundMessage) -> Result<HandlerReply, InterviewError> {
        match message {
            InboundMessage::Admin(request) => self.handle_admin(request).await,
            InboundMessage::Turn(request) => self.handle_turn(request).await,
        }
    }

    /// Read a conversation record without changing it.
    pub async fn conversation(
        &self,
        applicant_key: &str,
    ) -> Result<Option<ConversationRecord>, InterviewError> {
        self.sessions.load(applicant_key).await
    }

    async fn handle_admin(&self, request: AdminRequest) -> Result<HandlerReply, InterviewError> {
        self.gate
            .validate_admin_action(request)
            .await
            .inspect_err(|e| info!(error = %e, "invalid admin request"))?;
        Ok(HandlerReply::new(true, ADMIN_SUCCESS))
    }

    async fn handle_turn(&self, request: TurnRequest) -> Result<HandlerReply, InterviewError> {
        let turn = self.gate.validate_inbound_turn(request)?;

        if !self.gate.verify_applicant(&turn.applicant).await {
            info!(applicant_key = %turn.applicant.key, "unregistered applicant rejected");
            return Err(InterviewError::Unauthorized(UNREGISTERED_APPLICANT.to_string()));
        }

        if !self.delivery.is_reachable(&turn.route) {
            info!(route = %turn.route, "unknown sender rejected");
            return Err(InterviewError::MissingRoute(format!(
                "got invalid sender: {}",
                turn.route
            )));
        }

        info!(applicant_key = %turn.applicant.key, "verified applicant message");
        let outcome = self.sessions.advance(&turn.applicant, &turn.message).await?;

        let payload = serde_json::to_value(&outcome.outbound)
            .map_err(|e| InterviewError::DeliveryFailure(format!("encode reply: {e}")))?;
        self.delivery
            .deliver(HIRING_MANAGER_AGENT_ID, &turn.route, &payload)
            .await
            .map_err(|e| {
                warn!(route = %turn.route, error = %e, "reply delivery failed");
                InterviewError::DeliveryFailure(e.to_string())
            })?;

        if outcome.outbound.concluded {
            Ok(HandlerReply::new(true, outcome.evaluation.unwrap_or_default()))
        } else {
            Ok(HandlerReply::new(false, TURN_CONTINUES))
        }
    }
}
