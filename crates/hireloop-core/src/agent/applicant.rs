//! The example applicant agent.
//!
//! It opens an interview when told `start`, then answers every hiring
//! manager message with an LLM-generated reply until the hiring manager
//! marks the interview concluded.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hireloop_types::config::APPLICANT_AGENT_ID;
use hireloop_types::error::ApplicantError;
use hireloop_types::inbound::{ApplicantIdentity, InboundMessage, ReplyRoute, TurnRequest};
use hireloop_types::interview::OutboundMessage;
use hireloop_types::llm::{CompletionRequest, LlmError, Message};
use tracing::{Instrument, info, info_span};

use crate::delivery::Delivery;
use crate::interview::prompt;
use crate::llm::box_provider::BoxLlmProvider;

/// First turn the applicant sends after `start`.
pub const OPENING_MESSAGE: &str = "I am ready to start the interview.";

/// What the applicant did with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantStep {
    Started,
    Replied,
    Concluded,
}

impl fmt::Display for ApplicantStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicantStep::Started => write!(f, "Sent initial message."),
            ApplicantStep::Replied => write!(f, "Sent message to hiring manager."),
            ApplicantStep::Concluded => write!(f, "Interview has concluded."),
        }
    }
}

/// Construction parameters for [`ApplicantAgent`].
#[derive(Debug, Clone)]
pub struct ApplicantAgentConfig {
    pub identity: ApplicantIdentity,
    /// Where the hiring manager should send replies.
    pub own_route: ReplyRoute,
    /// Where turns for the hiring manager are sent.
    pub hiring_manager_route: ReplyRoute,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

pub struct ApplicantAgent<D> {
    provider: Arc<BoxLlmProvider>,
    delivery: Arc<D>,
    config: ApplicantAgentConfig,
}

impl<D: Delivery> ApplicantAgent<D> {
    pub fn new(provider: Arc<BoxLlmProvider>, delivery: Arc<D>, config: ApplicantAgentConfig) -> Self {
        Self {
            provider,
            delivery,
            config,
        }
    }

    /// Handle a manual trigger. Only `start` (optionally quoted) opens an interview.
    pub async fn start(&self, text: &str) -> Result<ApplicantStep, ApplicantError> {
        let trimmed = text.trim();
        let command = trimmed.strip_prefix('"').unwrap_or(trimmed);
        let command = command.strip_suffix('"').unwrap_or(command);
        info!(text = command, "applicant received manual trigger");

        if command != "start" {
            return Err(ApplicantError::NotStarted);
        }

        self.send_turn(OPENING_MESSAGE).await?;
        Ok(ApplicantStep::Started)
    }

    /// Handle a message from the hiring manager.
    pub async fn on_message(&self, message: OutboundMessage) -> Result<ApplicantStep, ApplicantError> {
        if message.concluded {
            info!(applicant_key = %self.config.identity.key, "interview concluded");
            return Ok(ApplicantStep::Concluded);
        }

        let reply = self.generate_reply(&message.message).await?;
        self.send_turn(&reply).await?;
        Ok(ApplicantStep::Replied)
    }

    async fn generate_reply(&self, question: &str) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message::user(prompt::applicant_prompt(question))],
            system: None,
            max_tokens: self.config.max_tokens,
            temperature: Some(0.8),
            stop_sequences: None,
            output_config: None,
        };

        let span = info_span!(
            "gen_ai.applicant_reply",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
        );

        let response = tokio::time::timeout(
            self.config.timeout,
            self.provider.complete(&request).instrument(span),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.config.timeout.as_secs()))??;

        Ok(response.content.trim().to_string())
    }

    async fn send_turn(&self, text: &str) -> Result<(), ApplicantError> {
        let turn = TurnRequest::new(&self.config.identity, text, &self.config.own_route);
        let payload = serde_json::to_value(InboundMessage::Turn(turn))
            .map_err(|e| ApplicantError::Delivery(format!("encode turn: {e}")))?;

        info!(route = %self.config.hiring_manager_route, "sending turn to hiring manager");
        self.delivery
            .deliver(APPLICANT_AGENT_ID, &self.config.hiring_manager_route, &payload)
            .await
            .map_err(|e| ApplicantError::Delivery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeProvider, RecordingDelivery};
    use hireloop_types::config::HIRING_MANAGER_AGENT_ID;

    fn agent(provider: FakeProvider) -> (ApplicantAgent<RecordingDelivery>, Arc<RecordingDelivery>) {
        let delivery = Arc::new(RecordingDelivery::default());
        let agent = ApplicantAgent::new(
            Arc::new(BoxLlmProvider::new(provider)),
            Arc::clone(&delivery),
            ApplicantAgentConfig {
                identity: ApplicantIdentity::new("Foo Bar", "abc"),
                own_route: ReplyRoute::Direct {
                    agent_id: APPLICANT_AGENT_ID.to_string(),
                },
                hiring_manager_route: ReplyRoute::Direct {
                    agent_id: HIRING_MANAGER_AGENT_ID.to_string(),
                },
                model: "test-model".to_string(),
                max_tokens: 256,
                timeout: Duration::from_secs(5),
            },
        );
        (agent, delivery)
    }

    #[tokio::test]
    async fn start_sends_opening_turn() {
        let (agent, delivery) = agent(FakeProvider::replying(Vec::<String>::new()));
        let step = agent.start("\"start\"").await.unwrap();
        assert_eq!(step, ApplicantStep::Started);
        assert_eq!(step.to_string(), "Sent initial message.");

        let sent = delivery.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, APPLICANT_AGENT_ID);
        assert_eq!(sent[0].2["kind"], "turn");
        assert_eq!(sent[0].2["applicantMessage"], OPENING_MESSAGE);
        assert_eq!(sent[0].2["fromId"], APPLICANT_AGENT_ID);
    }

    #[tokio::test]
    async fn anything_but_start_is_refused() {
        let (agent, delivery) = agent(FakeProvider::replying(Vec::<String>::new()));
        let err = agent.start("hello").await.unwrap_err();
        assert!(matches!(err, ApplicantError::NotStarted));
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn replies_with_generated_answer() {
        let provider = FakeProvider::replying(["  I built a scheduler in Rust.  "]);
        let (agent, delivery) = agent(provider.clone());

        let step = agent
            .on_message(OutboundMessage {
                message: "Tell me about your work.".to_string(),
                concluded: false,
            })
            .await
            .unwrap();
        assert_eq!(step, ApplicantStep::Replied);
        assert_eq!(
            delivery.sent()[0].2["applicantMessage"],
            "I built a scheduler in Rust."
        );
        assert!(
            provider.requests()[0].messages[0]
                .content
                .contains("Hiring manager: Tell me about your work.")
        );
    }

    #[tokio::test]
    async fn concluded_message_stops_the_loop() {
        let provider = FakeProvider::replying(Vec::<String>::new());
        let (agent, delivery) = agent(provider.clone());
        let step = agent
            .on_message(OutboundMessage {
                message: "Goodbye.".to_string(),
                concluded: true,
            })
            .await
            .unwrap();
        assert_eq!(step, ApplicantStep::Concluded);
        assert!(provider.requests().is_empty());
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn llm_failure_sends_nothing() {
        let (agent, delivery) = agent(FakeProvider::replying(Vec::<String>::new()));
        let err = agent
            .on_message(OutboundMessage {
                message: "Why?".to_string(),
                concluded: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicantError::Llm(_)));
        assert!(delivery.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        let (agent, delivery) = agent(FakeProvider::replying(Vec::<String>::new()));
        delivery.fail(true);
        let err = agent.start("start").await.unwrap_err();
        assert!(matches!(err, ApplicantError::Delivery(_)));
    }
}
