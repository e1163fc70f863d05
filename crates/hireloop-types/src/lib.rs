//! Shared domain types for hireloop.
//!
//! This crate contains the domain types exchanged between the applicant and
//! hiring-manager agents: conversation records, inbound/outbound message
//! shapes, LLM request/response types, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, schemars, secrecy, thiserror.

pub mod config;
pub mod error;
pub mod inbound;
pub mod interview;
pub mod llm;
