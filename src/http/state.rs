use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::handlers::WebhookResponse;
use crate::session::SessionStore;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The session registry (owns all session data and the insight engine)
    pub store: Arc<SessionStore>,

    /// Idempotency cache: client-supplied key → previously returned
    /// webhook response. Lets providers retry delivery safely.
    pub idempotency: Arc<Mutex<HashMap<String, WebhookResponse>>>,

    /// Service metadata surfaced by the health endpoint
    pub environment: String,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>, environment: String) -> Self {
        Self {
            store,
            idempotency: Arc::new(Mutex::new(HashMap::new())),
            environment,
            started_at: Utc::now(),
        }
    }
}
