//! LLM provider implementations.
//!
//! Contains the Anthropic implementation of the [`LlmProvider`] trait
//! defined in `hireloop-core`, and [`create_provider`], which builds it from
//! the resolved configuration.
//!
//! [`LlmProvider`]: hireloop_core::llm::provider::LlmProvider

pub mod anthropic;

use secrecy::{ExposeSecret, SecretString};

use hireloop_core::llm::box_provider::BoxLlmProvider;
use hireloop_types::config::HireloopConfig;
use hireloop_types::llm::LlmError;

use self::anthropic::AnthropicProvider;

/// Create the shared [`BoxLlmProvider`] from configuration.
///
/// Fails with [`LlmError::AuthenticationFailed`] when no API key is configured.
pub fn create_provider(config: &HireloopConfig) -> Result<BoxLlmProvider, LlmError> {
    let key = config
        .anthropic_api_key
        .as_ref()
        .ok_or(LlmError::AuthenticationFailed)?;
    let secret = SecretString::from(key.expose_secret().to_string());

    let mut provider = AnthropicProvider::new(secret, config.responder.timeout())?;
    if let Some(base_url) = &config.responder.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(BoxLlmProvider::new(provider))
}
