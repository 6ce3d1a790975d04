pub mod candidates;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

/// Resume uploads are capped at 10MB.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/questions/generate",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/api/v1/candidates/check-duplicate",
            post(candidates::handle_check_duplicate),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
