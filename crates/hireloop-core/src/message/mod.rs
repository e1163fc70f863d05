//! In-process agent messaging for local mode.
//!
//! - `bus` -- `MessageBus` with one bounded mailbox per agent id
//! - `envelope` -- `Envelope`, the unit of delivery

pub mod bus;
pub mod envelope;

pub use bus::{MessageBus, MessageError};
pub use envelope::Envelope;
