//! Storage abstractions for hireloop.
//!
//! Defines traits for the namespaced session store and the evaluation
//! archive. Implementations live in hireloop-infra.

pub mod archive;
pub mod kv_store;
