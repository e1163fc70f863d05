//! The interview core: access gate, session state machine, responder, prompts.

pub mod gate;
pub mod prompt;
pub mod responder;
pub mod session;

pub use gate::AccessGate;
pub use responder::{LlmResponder, LlmResponderSettings, Responder};
pub use session::SessionMachine;
