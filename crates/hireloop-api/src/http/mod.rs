//! HTTP surface for deployed mode.
//!
//! Both agents are hosted by one axum server under `/api/v1/`; replies use
//! the `{data, meta, errors}` envelope.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
