//! The two interview participants.
//!
//! - `hiring_manager` -- entry point for every inbound message; runs the gate
//!   and the session machine and delivers the reply
//! - `applicant` -- bundled example applicant that answers with an LLM

pub mod applicant;
pub mod hiring_manager;

pub use applicant::{ApplicantAgent, ApplicantStep};
pub use hiring_manager::{HiringManager, Welcome};
