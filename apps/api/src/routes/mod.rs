pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers::handle_extract;
use crate::feedback::handlers::{handle_analyze, handle_enhance, handle_job_match};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Feedback API
        .route("/api/analyze", post(handle_analyze))
        .route("/api/enhance", post(handle_enhance))
        .route("/api/job-match", post(handle_job_match))
        // Upload API
        .route(
            "/api/extract",
            post(handle_extract).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
