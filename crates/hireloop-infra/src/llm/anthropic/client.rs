//! AnthropicProvider -- concrete [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends requests to the Anthropic Messages API (`/v1/messages`). The API
//! key is wrapped in [`secrecy::SecretString`] and is never logged or
//! included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use hireloop_core::llm::provider::LlmProvider;
use hireloop_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use super::types::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse, ErrorPayload,
};

/// Anthropic Claude LLM provider.
///
/// The model is taken from each [`CompletionRequest`], so one provider
/// serves both the interviewer and the applicant.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    timeout: Duration,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
            timeout,
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
            stop_sequences: request.stop_sequences.clone(),
            output_config: request.output_config.clone(),
        }
    }
}

/// Map a non-2xx status and body to an [`LlmError`].
fn error_for_status(status: u16, body: &str, retry_after: Option<u64>) -> LlmError {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .map(|p| p.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        400 => LlmError::InvalidRequest(message),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: retry_after.map(|secs| secs * 1000),
        },
        529 => LlmError::Overloaded(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout.as_secs())
                } else {
                    LlmError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &error_body, retry_after));
        }

        let anthropic_resp: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let content = anthropic_resp
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        let stop_reason = anthropic_resp
            .stop_reason
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(StopReason::EndTurn);

        Ok(CompletionResponse {
            id: anthropic_resp.id,
            content,
            model: anthropic_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: anthropic_resp.usage.input_tokens,
                output_tokens: anthropic_resp.usage.output_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireloop_types::llm::{Message, OutputConfig};

    fn make_provider() -> AnthropicProvider {
        AnthropicProvider::new(SecretString::from("test-key-not-real"), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider().name(), "anthropic");
    }

    #[test]
    fn test_to_anthropic_request_keeps_output_config() {
        let provider = make_provider();
        let request = CompletionRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            messages: vec![Message::user("Hello")],
            system: Some("Be brief".to_string()),
            max_tokens: 1024,
            temperature: Some(0.7),
            stop_sequences: None,
            output_config: Some(OutputConfig::json_schema(
                "interview_turn",
                serde_json::json!({"type": "object"}),
            )),
        };

        let anthropic_req = provider.to_anthropic_request(&request);
        assert_eq!(anthropic_req.model, "claude-sonnet-4-20250514");
        assert_eq!(anthropic_req.messages[0].role, "user");
        assert_eq!(anthropic_req.system.as_deref(), Some("Be brief"));
        assert!(anthropic_req.output_config.is_some());
    }

    #[test]
    fn test_base_url_override() {
        let provider = make_provider().with_base_url("http://localhost:8080/");
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            error_for_status(401, "", None),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            error_for_status(429, "", Some(3)),
            LlmError::RateLimited {
                retry_after_ms: Some(3000)
            }
        ));
        let overloaded = error_for_status(
            529,
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
            None,
        );
        assert!(matches!(overloaded, LlmError::Overloaded(ref m) if m == "Overloaded"));
        assert!(matches!(
            error_for_status(400, "bad schema", None),
            LlmError::InvalidRequest(ref m) if m == "bad schema"
        ));
    }
}
