use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingestion
        .route("/webhook", post(handlers::receive_webhook))
        // Session queries
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/:session_id", get(handlers::get_session))
        .route(
            "/sessions/:session_id/summary",
            get(handlers::get_session_summary),
        )
        .route(
            "/sessions/:session_id/transcript",
            get(handlers::get_session_transcript),
        )
        // Insights
        .route("/insights/:session_id", get(handlers::get_insights))
        .route(
            "/insights/:session_id/coaching",
            get(handlers::get_coaching),
        )
        .route(
            "/insights/:session_id/refresh",
            post(handlers::refresh_insights),
        )
        .route("/insights/:session_id/ws", get(handlers::insights_ws))
        // Request logging + CORS middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
