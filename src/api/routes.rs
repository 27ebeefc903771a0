//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{display_index, get_emy_patient, health, metrics_text, root_page, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Page shells
        .route("/", get(root_page))
        .route("/display", get(display_index))
        .route("/display/", get(display_index))
        // EMY data
        .route("/display/getemypatient", get(get_emy_patient))
        // Health and metrics
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
