use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::engine::{InsightEngine, SessionInsights};

use super::segment::TranscriptSegment;
use super::session::SessionData;
use super::stats::{FormattedTranscript, SessionSnapshot, SessionSummary};

/// Summary statistics across all sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub active_sessions: usize,
    pub total_segments: usize,
}

/// In-memory store for conversation sessions.
///
/// Each session is keyed by its `session_id`. One store-wide async
/// mutex serializes every operation, so each call is atomic with
/// respect to every other call: no racy duplicate appends, no reads of
/// a half-updated session. The critical sections do only in-memory work.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionData>>,
    engine: InsightEngine,
}

impl SessionStore {
    pub fn new(engine: InsightEngine) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            engine,
        }
    }

    /// Add segments to a session, creating it if needed.
    ///
    /// Returns the number of new (non-duplicate) segments stored.
    pub async fn add_segments(
        &self,
        session_id: &str,
        segments: Vec<TranscriptSegment>,
    ) -> usize {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!("Creating session: {}", session_id);
                SessionData::new(session_id)
            });
        session.add_segments(segments)
    }

    /// Raw session detail, or None if the session doesn't exist.
    pub async fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).map(|s| s.snapshot())
    }

    /// Aggregated session analytics, or None if the session doesn't exist.
    pub async fn summary(&self, session_id: &str) -> Option<SessionSummary> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).map(|s| s.summary())
    }

    /// Speaker-labeled transcript, or None if the session doesn't exist.
    pub async fn transcript(&self, session_id: &str) -> Option<FormattedTranscript> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id).map(|s| s.formatted_transcript())
    }

    /// Run the insight engine over a session's ordered segments and
    /// cache the result on the session. None for unknown sessions.
    pub async fn run_analysis(&self, session_id: &str) -> Option<SessionInsights> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(session_id)?;
        let result = self
            .engine
            .analyze(&session.ordered_segments(), session_id);
        session.set_latest_insights(result.clone());
        Some(result)
    }

    /// Cached insights for a session. None when the session doesn't
    /// exist or no analysis has run yet.
    pub async fn cached_insights(&self, session_id: &str) -> Option<SessionInsights> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id)?.latest_insights().cloned()
    }

    /// Cached insights if present, otherwise run a fresh analysis and
    /// cache it. None only when the session doesn't exist.
    pub async fn insights_or_analyze(&self, session_id: &str) -> Option<SessionInsights> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(session_id)?;
        if let Some(cached) = session.latest_insights() {
            return Some(cached.clone());
        }
        let result = self
            .engine
            .analyze(&session.ordered_segments(), session_id);
        session.set_latest_insights(result.clone());
        Some(result)
    }

    /// Whether a session with this id exists.
    pub async fn contains(&self, session_id: &str) -> bool {
        let sessions = self.sessions.lock().await;
        sessions.contains_key(session_id)
    }

    /// All known session IDs. No ordering guarantee.
    pub async fn list_sessions(&self) -> Vec<String> {
        let sessions = self.sessions.lock().await;
        sessions.keys().cloned().collect()
    }

    /// Summary statistics across all sessions.
    pub async fn stats(&self) -> StoreStats {
        let sessions = self.sessions.lock().await;
        StoreStats {
            active_sessions: sessions.len(),
            total_segments: sessions.values().map(|s| s.segment_count()).sum(),
        }
    }
}
