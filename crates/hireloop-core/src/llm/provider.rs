//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement.

use hireloop_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Wrap an
/// implementation in [`BoxLlmProvider`](super::box_provider::BoxLlmProvider)
/// for runtime selection.
///
/// Implementations live in hireloop-infra (e.g., `AnthropicProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
