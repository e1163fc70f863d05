//! HTTP request handlers.

pub mod applicant;
pub mod conversation;
pub mod health;
pub mod hiring_manager;
