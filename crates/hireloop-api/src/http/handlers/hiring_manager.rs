//! Hiring manager endpoints.
//!
//! POST /api/v1/hiring-manager - one inbound message (admin or turn)
//! GET  /api/v1/welcome        - how to register an applicant

use std::future::Future;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;

use hireloop_core::agent::Welcome;
use hireloop_types::error::InterviewError;
use hireloop_types::interview::HandlerReply;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::ServerState;

/// Run `work` on its own task and wait for it.
///
/// Hyper drops the handler future when the client disconnects. A turn must
/// still run to completion (evaluation, archive, persist, reply) once it has
/// started, so it is never polled from the handler itself.
pub async fn run_detached<F, T>(work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, InterviewError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| AppError::Internal(format!("message handler task failed: {e}")))?
        .map_err(AppError::from)
}

/// POST /api/v1/hiring-manager
///
/// The body is parsed here rather than by the `Json` extractor so malformed
/// JSON surfaces as `VALIDATION_ERROR` like any other bad shape.
pub async fn receive(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<ApiResponse<HandlerReply>, AppError> {
    let start = Instant::now();
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| InterviewError::InvalidShape(format!("body is not JSON: {e}")))?;

    let hiring_manager = state.agents.hiring_manager.clone();
    let reply = run_detached(async move { hiring_manager.handle_value(value).await }).await?;
    Ok(ApiResponse::timed(reply, start))
}

/// GET /api/v1/welcome
pub async fn welcome(State(state): State<ServerState>) -> ApiResponse<Welcome> {
    let start = Instant::now();
    let welcome = Welcome::for_applicant(&state.app.config.applicant_identity());
    ApiResponse::timed(welcome, start)
}
