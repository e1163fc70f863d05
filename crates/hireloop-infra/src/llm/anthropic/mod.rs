//! Anthropic Claude LLM provider implementation.
//!
//! [`AnthropicProvider`] implements the
//! [`LlmProvider`](hireloop_core::llm::provider::LlmProvider) trait for the
//! Anthropic Messages API (non-streaming).

pub mod client;
pub mod types;

pub use client::AnthropicProvider;
