//! HTTP API
//!
//! This module provides the REST/WebSocket surface around the session store:
//! - POST /webhook - Ingest transcript segments (idempotency-key aware)
//! - GET /sessions - List sessions and aggregate stats
//! - GET /sessions/:id - Raw session data
//! - GET /sessions/:id/summary - Speaker stats, talk ratios, duration
//! - GET /sessions/:id/transcript - Formatted transcript
//! - GET /insights/:id - Detected insights, filterable
//! - GET /insights/:id/coaching - Actionable suggestions only
//! - POST /insights/:id/refresh - Force a re-analysis
//! - GET /insights/:id/ws - WebSocket insight push
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{
    CoachingResponse, ErrorResponse, HealthResponse, ListSessionsResponse, WebhookPayload,
    WebhookResponse,
};
pub use routes::create_router;
pub use state::AppState;
