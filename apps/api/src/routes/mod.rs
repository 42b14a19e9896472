pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        // Single-document analysis
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze),
        )
        .route("/api/v1/sessions/:id/result", get(handlers::handle_get_result))
        .route(
            "/api/v1/sessions/:id/result/export",
            get(handlers::handle_export_result),
        )
        // Batch analysis
        .route(
            "/api/v1/sessions/:id/batch",
            post(handlers::handle_batch).get(handlers::handle_get_batch),
        )
        .route(
            "/api/v1/sessions/:id/batch/export",
            get(handlers::handle_export_batch),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
