//! Business logic and port trait definitions for hireloop.
//!
//! This crate defines the "ports" (session store, LLM provider, delivery,
//! evaluation archive) that the infrastructure layer implements, plus the
//! access gate, the interview session state machine and both agents. It
//! depends only on `hireloop-types` -- never on `hireloop-infra` or any
//! database/IO crate.

pub mod agent;
pub mod delivery;
pub mod interview;
pub mod llm;
pub mod message;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
