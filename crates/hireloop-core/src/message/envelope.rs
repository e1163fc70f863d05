//! Envelope carried by the in-process message bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One JSON payload addressed from one agent to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub payload: serde_json::Value,
    pub sent_at: DateTime<Utc>,
}

impl Envelope {
    pub fn new(from: impl Into<String>, to: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            from: from.into(),
            to: to.into(),
            payload,
            sent_at: Utc::now(),
        }
    }
}
