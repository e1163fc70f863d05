//! Axum router configuration with middleware.
//!
//! Agent endpoints live under `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::ServerState;

/// Build the router for both agents.
pub fn build_router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Hiring manager
        .route("/hiring-manager", post(handlers::hiring_manager::receive))
        .route("/welcome", get(handlers::hiring_manager::welcome))
        .route(
            "/conversations/{key}",
            get(handlers::conversation::get_conversation),
        )
        // Example applicant
        .route("/applicant", post(handlers::applicant::receive))
        .route("/applicant/start", post(handlers::applicant::start));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
