//! Outbound delivery port.
//!
//! A reply travels over exactly one transport, chosen by its [`ReplyRoute`]:
//! in-process dispatch to a named agent or an HTTP callback POST. The
//! concrete `RoutedDelivery` lives in hireloop-infra.

use std::time::Duration;

use hireloop_types::inbound::ReplyRoute;
use thiserror::Error;

use crate::message::MessageError;

/// Errors from sending a message to a counterpart.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The in-process bus refused the envelope.
    #[error("direct delivery failed: {0}")]
    Bus(#[from] MessageError),

    /// The callback endpoint answered with a non-success status.
    #[error("callback returned HTTP {status}")]
    Rejected { status: u16 },

    /// The callback request could not be sent.
    #[error("callback request failed: {0}")]
    Http(String),

    /// The callback did not answer in time.
    #[error("callback timed out after {0:?}")]
    Timeout(Duration),
}

/// Sends JSON payloads to a counterpart.
pub trait Delivery: Send + Sync {
    /// Deliver `payload` from agent `from` to `route`.
    fn deliver(
        &self,
        from: &str,
        route: &ReplyRoute,
        payload: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;

    /// Whether `route` names a target this delivery can currently reach.
    ///
    /// Used to reject a turn with an unknown sender before any state changes.
    fn is_reachable(&self, route: &ReplyRoute) -> bool {
        let _ = route;
        true
    }
}
