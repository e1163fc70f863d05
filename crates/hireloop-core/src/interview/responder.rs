//! The Responder: LLM-backed turn generation and final evaluation.
//!
//! The session machine depends on the [`Responder`] trait only.
//! [`LlmResponder`] is the production implementation over a
//! [`BoxLlmProvider`] and uses schema-constrained structured output for
//! turns.

use std::sync::Arc;

use hireloop_types::interview::GeneratedTurn;
use hireloop_types::llm::{
    CompletionRequest, LlmError, Message, OutputConfig, add_additional_properties_false,
};
use tracing::{Instrument, debug, info_span};

use super::prompt;
use crate::llm::box_provider::BoxLlmProvider;

/// Generates interviewer turns and final evaluations.
pub trait Responder: Send + Sync {
    /// Produce the next hiring-manager turn from the transcript so far.
    ///
    /// `turn` is the number of completed turns before this one.
    fn next_turn(
        &self,
        transcript: &str,
        turn: u32,
    ) -> impl std::future::Future<Output = Result<GeneratedTurn, LlmError>> + Send;

    /// Produce the final markdown evaluation over the complete transcript.
    fn evaluate(
        &self,
        transcript: &str,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

/// Settings for [`LlmResponder`].
#[derive(Debug, Clone)]
pub struct LlmResponderSettings {
    pub model: String,
    pub max_turns: u32,
    pub turn_max_tokens: u32,
    pub evaluation_max_tokens: u32,
}

/// Responder backed by an LLM provider.
pub struct LlmResponder {
    provider: Arc<BoxLlmProvider>,
    settings: LlmResponderSettings,
    turn_schema: serde_json::Value,
}

impl LlmResponder {
    pub fn new(provider: Arc<BoxLlmProvider>, settings: LlmResponderSettings) -> Self {
        Self {
            provider,
            settings,
            turn_schema: turn_schema(),
        }
    }

    fn turn_request(&self, transcript: &str, turn: u32) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt::interview_prompt(
                transcript,
                turn,
                self.settings.max_turns,
            ))],
            system: None,
            max_tokens: self.settings.turn_max_tokens,
            temperature: Some(0.9),
            stop_sequences: None,
            output_config: Some(OutputConfig::json_schema(
                "interview_turn",
                self.turn_schema.clone(),
            )),
        }
    }

    fn evaluation_request(&self, transcript: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt::evaluation_prompt(transcript))],
            system: None,
            max_tokens: self.settings.evaluation_max_tokens,
            temperature: Some(0.2),
            stop_sequences: None,
            output_config: None,
        }
    }
}

impl Responder for LlmResponder {
    async fn next_turn(&self, transcript: &str, turn: u32) -> Result<GeneratedTurn, LlmError> {
        let request = self.turn_request(transcript, turn);

        let span = info_span!(
            "gen_ai.interview_turn",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            interview.turn = turn,
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        let generated = parse_generated_turn(&response.content)?;
        debug!(
            category = %generated.category,
            concluded = generated.concluded,
            output_tokens = response.usage.output_tokens,
            "generated interview turn"
        );
        Ok(generated)
    }

    async fn evaluate(&self, transcript: &str) -> Result<String, LlmError> {
        let request = self.evaluation_request(transcript);

        let span = info_span!(
            "gen_ai.evaluation",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        Ok(response.content.trim().to_string())
    }
}

/// JSON schema for [`GeneratedTurn`], closed for strict structured output.
pub fn turn_schema() -> serde_json::Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(GeneratedTurn))
        .unwrap_or_else(|_| serde_json::json!({"type": "object"}));
    add_additional_properties_false(&mut schema);
    schema
}

/// Parse the model output into a [`GeneratedTurn`].
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence.
fn parse_generated_turn(content: &str) -> Result<GeneratedTurn, LlmError> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body)
        .map_err(|e| LlmError::Deserialization(format!("interviewer turn: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeProvider;
    use hireloop_types::interview::QuestionCategory;

    fn responder(provider: FakeProvider) -> (LlmResponder, FakeProvider) {
        let handle = provider.clone();
        let responder = LlmResponder::new(
            Arc::new(BoxLlmProvider::new(provider)),
            LlmResponderSettings {
                model: "test-model".to_string(),
                max_turns: 10,
                turn_max_tokens: 512,
                evaluation_max_tokens: 2048,
            },
        );
        (responder, handle)
    }

    #[tokio::test]
    async fn next_turn_parses_structured_output() {
        let (responder, provider) = responder(FakeProvider::replying([
            r#"{"message":"What breaks first?","question_type":"technical_accuracy","done":false}"#,
        ]));

        let turn = responder.next_turn("Foo Bar: ready", 0).await.unwrap();
        assert_eq!(turn.message, "What breaks first?");
        assert_eq!(turn.category, QuestionCategory::TechnicalAccuracy);
        assert!(!turn.concluded);

        let sent = provider.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "test-model");
        let config = sent[0].output_config.as_ref().unwrap();
        assert_eq!(config.format.json_schema.name, "interview_turn");
        assert!(sent[0].messages[0].content.contains("This is message 0 of 10."));
    }

    #[tokio::test]
    async fn next_turn_accepts_fenced_json() {
        let (responder, _) = responder(FakeProvider::replying([
            "```json\n{\"message\":\"Bye.\",\"question_type\":\"efficiency_verbosity\",\"done\":true}\n```",
        ]));
        let turn = responder.next_turn("", 9).await.unwrap();
        assert!(turn.concluded);
    }

    #[tokio::test]
    async fn next_turn_rejects_unknown_category() {
        let (responder, _) = responder(FakeProvider::replying([
            r#"{"message":"x","question_type":"small_talk","done":false}"#,
        ]));
        let err = responder.next_turn("", 0).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn evaluate_returns_plain_text_without_schema() {
        let (responder, provider) = responder(FakeProvider::replying(["  # Report\n"]));
        let report = responder.evaluate("Foo Bar: hi").await.unwrap();
        assert_eq!(report, "# Report");
        assert!(provider.requests()[0].output_config.is_none());
    }

    #[test]
    fn turn_schema_is_closed() {
        let schema = turn_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert!(schema["properties"].get("question_type").is_some());
        assert!(schema["properties"].get("done").is_some());
    }
}
