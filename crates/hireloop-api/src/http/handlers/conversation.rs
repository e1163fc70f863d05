//! GET /api/v1/conversations/{key} - read one conversation record.
//!
//! A key with no stored record reads as a `new` conversation.

use std::time::Instant;

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use hireloop_types::interview::{ConversationRecord, SessionState};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct ConversationView {
    pub applicant_key: String,
    pub state: SessionState,
    pub turn_count: u32,
    pub concluded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// One line per entry, oldest first.
    pub transcript: Vec<String>,
}

impl ConversationView {
    pub fn new(applicant_key: &str, record: Option<&ConversationRecord>) -> Self {
        let state = SessionState::of(record);
        let record = record.cloned().unwrap_or_default();
        Self {
            applicant_key: applicant_key.to_string(),
            state,
            turn_count: record.turn_count,
            concluded: record.concluded,
            updated_at: record.updated_at,
            transcript: record.history.iter().map(ToString::to_string).collect(),
        }
    }
}

pub async fn get_conversation(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<ApiResponse<ConversationView>, AppError> {
    let start = Instant::now();
    let record = state.agents.hiring_manager.conversation(&key).await?;
    Ok(ApiResponse::timed(
        ConversationView::new(&key, record.as_ref()),
        start,
    ))
}
