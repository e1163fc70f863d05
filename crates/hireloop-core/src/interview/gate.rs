//! Access gate: rejects malformed, unauthorized or misrouted messages
//! before any conversation state changes.

use std::sync::Arc;

use hireloop_types::config::DeploymentMode;
use hireloop_types::error::InterviewError;
use hireloop_types::inbound::{
    AdminAction, AdminCommand, AdminRequest, ApplicantIdentity, ReplyRoute, TurnRequest, ValidTurn,
};
use hireloop_types::interview::REGISTRY_NAMESPACE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::storage::kv_store::KvStore;

/// Reply text for a turn from an applicant missing from the registry.
pub const UNREGISTERED_APPLICANT: &str = "Sorry, I only talk to registered applicants.";

/// Validates inbound messages and owns the applicant registry.
pub struct AccessGate<S> {
    store: Arc<S>,
    admin_key: Option<SecretString>,
    mode: DeploymentMode,
}

impl<S: KvStore> AccessGate<S> {
    /// `admin_key` of `None` disables admin actions entirely.
    pub fn new(store: Arc<S>, admin_key: Option<SecretString>, mode: DeploymentMode) -> Self {
        Self {
            store,
            admin_key,
            mode,
        }
    }

    /// Check an admin request and apply it to the registry.
    ///
    /// `register` upserts key -> name; `unregister` removes the key and
    /// succeeds even when it was never registered.
    pub async fn validate_admin_action(
        &self,
        request: AdminRequest,
    ) -> Result<AdminAction, InterviewError> {
        let action = shape_admin_request(request)?;

        let authorized = self
            .admin_key
            .as_ref()
            .is_some_and(|secret| secret.expose_secret() == action.admin_key);
        if !authorized {
            warn!(applicant_key = %action.applicant.key, "admin key mismatch");
            return Err(InterviewError::Unauthorized(
                "admin key does not match".to_string(),
            ));
        }

        match action.command {
            AdminCommand::Register => {
                self.store
                    .set(
                        REGISTRY_NAMESPACE,
                        &action.applicant.key,
                        &serde_json::Value::String(action.applicant.name.clone()),
                    )
                    .await?;
            }
            AdminCommand::Unregister => {
                self.store
                    .delete(REGISTRY_NAMESPACE, &action.applicant.key)
                    .await?;
            }
        }

        info!(
            command = %action.command,
            applicant_key = %action.applicant.key,
            "applied admin action"
        );
        Ok(action)
    }

    /// True iff the registry maps `applicant.key` to exactly `applicant.name`.
    ///
    /// A store failure counts as not registered.
    pub async fn verify_applicant(&self, applicant: &ApplicantIdentity) -> bool {
        match self.store.get(REGISTRY_NAMESPACE, &applicant.key).await {
            Ok(Some(serde_json::Value::String(name))) => name == applicant.name,
            Ok(_) => false,
            Err(e) => {
                warn!(applicant_key = %applicant.key, error = %e, "registry lookup failed");
                false
            }
        }
    }

    /// Check the shape of a turn and resolve its reply route for this mode.
    ///
    /// Local mode requires `fromId`, deployed mode requires `fromWebhook`.
    pub fn validate_inbound_turn(&self, request: TurnRequest) -> Result<ValidTurn, InterviewError> {
        let name = required(request.applicant_name, "applicantName")?;
        let key = required(request.applicant_key, "applicantKey")?;
        let message = required(request.applicant_message, "applicantMessage")?;

        let route = match self.mode {
            DeploymentMode::Local => {
                let agent_id = non_empty(request.from_id).ok_or_else(|| {
                    InterviewError::MissingRoute("no sender id, can't proceed".to_string())
                })?;
                ReplyRoute::Direct { agent_id }
            }
            DeploymentMode::Deployed => {
                let url = non_empty(request.from_webhook).ok_or_else(|| {
                    InterviewError::MissingRoute("no sender webhook, can't proceed".to_string())
                })?;
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(InterviewError::MissingRoute(format!(
                        "sender webhook is not an http(s) URL: {url}"
                    )));
                }
                ReplyRoute::Callback { url }
            }
        };

        Ok(ValidTurn {
            applicant: ApplicantIdentity::new(name, key),
            message,
            route,
        })
    }
}

fn shape_admin_request(request: AdminRequest) -> Result<AdminAction, InterviewError> {
    let name = required(request.applicant_name, "applicantName")?;
    let key = required(request.applicant_key, "applicantKey")?;
    let admin_key = required(request.admin_key, "adminKey")?;
    let action = required(request.action, "action")?;
    let command = AdminCommand::parse(&action).ok_or_else(|| {
        InterviewError::InvalidShape(format!(
            "action must be 'register' or 'unregister', got '{action}'"
        ))
    })?;

    Ok(AdminAction {
        applicant: ApplicantIdentity::new(name, key),
        admin_key,
        command,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, InterviewError> {
    non_empty(value).ok_or_else(|| InterviewError::InvalidShape(format!("{field} is required")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
