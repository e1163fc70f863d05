//! Example applicant endpoints.
//!
//! POST /api/v1/applicant       - hiring manager reply callback
//! POST /api/v1/applicant/start - manual trigger (`{"text": "start"}`)
//!
//! The callback acknowledges before answering: the applicant's next turn is
//! generated and sent from a background task, so the hiring manager's
//! delivery POST never waits on the following turn.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use hireloop_types::error::InterviewError;
use hireloop_types::interview::OutboundMessage;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicantAck {
    pub accepted: bool,
    pub text: String,
}

/// POST /api/v1/applicant
pub async fn receive(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<ApiResponse<ApplicantAck>, AppError> {
    let start = Instant::now();
    let message: OutboundMessage = serde_json::from_slice(&body)
        .map_err(|e| InterviewError::InvalidShape(format!("invalid hiring manager reply: {e}")))?;

    let concluded = message.concluded;
    let applicant = state.agents.applicant.clone();
    tokio::spawn(async move {
        match applicant.on_message(message).await {
            Ok(step) => info!(%step, "applicant handled reply"),
            Err(e) => warn!(error = %e, "applicant failed to answer"),
        }
    });

    let text = if concluded {
        "Interview has concluded."
    } else {
        "Reply received."
    };
    Ok(ApiResponse::timed(
        ApplicantAck {
            accepted: true,
            text: text.to_string(),
        },
        start,
    ))
}

/// POST /api/v1/applicant/start
pub async fn start(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<ApiResponse<ApplicantAck>, AppError> {
    let start = Instant::now();
    let request: StartRequest = serde_json::from_slice(&body)
        .map_err(|e| InterviewError::InvalidShape(format!("expected {{\"text\": ...}}: {e}")))?;

    let step = state.agents.applicant.start(&request.text).await?;
    Ok(ApiResponse::timed(
        ApplicantAck {
            accepted: true,
            text: step.to_string(),
        },
        start,
    ))
}
