use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/interviews/start", post(handlers::start_interview))
        .route(
            "/interviews/:session_id/end",
            post(handlers::end_interview),
        )
        // Session queries
        .route("/interviews/:session_id/status", get(handlers::get_status))
        .route(
            "/interviews/:session_id/transcript",
            get(handlers::get_transcript),
        )
        .route(
            "/interviews/:session_id/pipeline",
            get(handlers::get_pipeline),
        )
        // Summary editing support
        .route("/names/extract", post(handlers::extract_names))
        // The interview page calls this API cross-origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
