//! GET /health - liveness plus a database round trip.

use axum::Json;
use axum::extract::State;

use crate::state::ServerState;

pub async fn health(State(state): State<ServerState>) -> Json<serde_json::Value> {
    let database = match sqlx::query("SELECT 1")
        .execute(&state.app.db_pool.reader)
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "health check query failed");
            "unavailable"
        }
    };

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.app.config.mode.to_string(),
        "database": database,
    }))
}
