//! Infrastructure layer for hireloop.
//!
//! Contains implementations of the port traits defined in `hireloop-core`:
//! SQLite session store, Anthropic LLM provider, routed delivery (message
//! bus or HTTP webhook), filesystem evaluation archive, and the
//! configuration loader.

pub mod archive;
pub mod config;
pub mod delivery;
pub mod llm;
pub mod sqlite;
