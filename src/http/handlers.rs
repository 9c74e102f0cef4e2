use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::state::AppState;
use crate::engine::{Insight, InsightKind, SessionInsights};
use crate::session::TranscriptSegment;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Ingestion payload posted by the transcription provider
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub session_id: String,
    pub segments: Vec<TranscriptSegment>,
}

/// Response returned to the provider after receiving a webhook
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub status: String,
    pub session_id: String,
    pub segments_received: usize,
}

#[derive(Debug, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<String>,
    pub active_sessions: usize,
    pub total_segments: usize,
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    /// Filter by insight category (e.g. pricing_objection, buying_signal)
    #[serde(rename = "type")]
    pub kind: Option<InsightKind>,

    /// Minimum confidence threshold (0.0–1.0)
    #[serde(default)]
    pub min_confidence: f64,
}

/// One actionable suggestion in the coaching view
#[derive(Debug, Serialize)]
pub struct CoachingTip {
    pub suggestion: String,
    pub trigger: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct CoachingResponse {
    pub session_id: String,
    pub coaching: BTreeMap<InsightKind, Vec<CoachingTip>>,
    pub total_suggestions: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub started_at: String,
    pub uptime_seconds: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Command a WebSocket client can send to force a re-analysis
#[derive(Debug, Deserialize)]
struct WsCommand {
    action: String,
}

fn not_found(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

fn unprocessable(detail: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: detail.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Webhook ingestion
// ============================================================================

/// POST /webhook
/// Receive a batch of transcript segments for a session.
///
/// Supports an optional X-Idempotency-Key header: replays of a key that
/// was already processed return the cached response without re-ingesting.
/// Stored segments are deduplicated by (timestamp, text), and a
/// background analysis run is triggered after every accepted batch.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookPayload>,
) -> Response {
    if payload.session_id.is_empty() {
        return unprocessable("session_id must not be empty");
    }
    if payload.segments.is_empty() {
        return unprocessable("segments must not be empty");
    }
    if payload.segments.iter().any(|s| s.text.is_empty()) {
        return unprocessable("segment text must not be empty");
    }

    let idempotency_key = headers
        .get("x-idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(key) = &idempotency_key {
        let cache = state.idempotency.lock().await;
        if let Some(cached) = cache.get(key) {
            info!(
                "Idempotent replay: key={} session={}",
                key, payload.session_id
            );
            return (StatusCode::OK, Json(cached.clone())).into_response();
        }
    }

    let segment_count = payload.segments.len();
    let new_count = state
        .store
        .add_segments(&payload.session_id, payload.segments)
        .await;

    info!(
        "Webhook received: session={} segments_in_payload={} new_stored={}",
        payload.session_id, segment_count, new_count
    );

    let response = WebhookResponse {
        status: "ok".to_string(),
        session_id: payload.session_id.clone(),
        segments_received: new_count,
    };

    if let Some(key) = idempotency_key {
        let mut cache = state.idempotency.lock().await;
        cache.insert(key, response.clone());
    }

    // Run insight analysis in the background so the webhook reply stays fast
    let store = state.store.clone();
    let session_id = payload.session_id.clone();
    tokio::spawn(async move {
        match store.run_analysis(&session_id).await {
            Some(result) => info!(
                "Background analysis done: session={} insights={}",
                session_id, result.total_insights
            ),
            None => warn!("Background analysis skipped, session gone: {}", session_id),
        }
    });

    (StatusCode::OK, Json(response)).into_response()
}

// ============================================================================
// Session queries
// ============================================================================

/// GET /sessions
/// List active session IDs and aggregate stats.
pub async fn list_sessions(State(state): State<AppState>) -> Response {
    let sessions = state.store.list_sessions().await;
    let stats = state.store.stats().await;
    (
        StatusCode::OK,
        Json(ListSessionsResponse {
            sessions,
            active_sessions: stats.active_sessions,
            total_segments: stats.total_segments,
        }),
    )
        .into_response()
}

/// GET /sessions/:session_id
/// Raw transcript data for a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.store.snapshot(&session_id).await {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => not_found(&session_id),
    }
}

/// GET /sessions/:session_id/summary
/// Talk ratios, speaker stats, word counts, and duration.
pub async fn get_session_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.store.summary(&session_id).await {
        Some(summary) => (StatusCode::OK, Json(summary)).into_response(),
        None => not_found(&session_id),
    }
}

/// GET /sessions/:session_id/transcript
/// Full transcript with speaker labels, ordered by timestamp.
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.store.transcript(&session_id).await {
        Some(transcript) => (StatusCode::OK, Json(transcript)).into_response(),
        None => not_found(&session_id),
    }
}

// ============================================================================
// Insights
// ============================================================================

/// GET /insights/:session_id
/// Detected insights, optionally filtered by category and confidence.
///
/// Filtering works on a copy of the cached (or freshly computed) set and
/// never mutates the cache. Summary counts are recomputed over the
/// filtered subset.
pub async fn get_insights(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<InsightsQuery>,
) -> Response {
    let insights = match state.store.insights_or_analyze(&session_id).await {
        Some(insights) => insights,
        None => return not_found(&session_id),
    };

    let mut filtered: Vec<Insight> = insights.insights;
    if let Some(kind) = query.kind {
        filtered.retain(|i| i.kind == kind);
    }
    if query.min_confidence > 0.0 {
        filtered.retain(|i| i.confidence >= query.min_confidence);
    }

    let mut summary: BTreeMap<InsightKind, usize> = BTreeMap::new();
    for insight in &filtered {
        *summary.entry(insight.kind).or_default() += 1;
    }

    (
        StatusCode::OK,
        Json(SessionInsights {
            session_id,
            total_insights: filtered.len(),
            insights: filtered,
            summary,
        }),
    )
        .into_response()
}

/// GET /insights/:session_id/coaching
/// Actionable suggestions grouped by category, for quick consumption
/// during a live call. Only insights with confidence >= 0.6 qualify.
pub async fn get_coaching(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let insights = match state.store.insights_or_analyze(&session_id).await {
        Some(insights) => insights,
        None => return not_found(&session_id),
    };

    let mut coaching: BTreeMap<InsightKind, Vec<CoachingTip>> = BTreeMap::new();
    for insight in &insights.insights {
        if insight.confidence < 0.6 {
            continue;
        }
        coaching.entry(insight.kind).or_default().push(CoachingTip {
            suggestion: insight.suggestion.clone(),
            trigger: insight.matched_phrase.clone(),
            confidence: insight.confidence,
        });
    }

    let total_suggestions = coaching.values().map(|v| v.len()).sum();

    (
        StatusCode::OK,
        Json(CoachingResponse {
            session_id,
            coaching,
            total_suggestions,
        }),
    )
        .into_response()
}

/// POST /insights/:session_id/refresh
/// Force a fresh analysis run and overwrite the cached result.
pub async fn refresh_insights(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.store.run_analysis(&session_id).await {
        Some(insights) => {
            info!(
                "Analysis refreshed: session={} insights={}",
                session_id, insights.total_insights
            );
            (StatusCode::OK, Json(insights)).into_response()
        }
        None => not_found(&session_id),
    }
}

// ============================================================================
// WebSocket push
// ============================================================================

/// GET /insights/:session_id/ws
/// Real-time insight streaming.
///
/// Polls every 2 seconds and pushes the full insight set whenever the
/// insight count changes. The client can send `{"action": "refresh"}`
/// to force a re-analysis.
pub async fn insights_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| stream_insights(socket, state, session_id))
}

async fn stream_insights(mut socket: WebSocket, state: AppState, session_id: String) {
    info!("WebSocket connected: session={}", session_id);

    let mut last_count = 0usize;

    loop {
        // Wait up to one poll interval for a client command
        match tokio::time::timeout(Duration::from_secs(2), socket.recv()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                if let Ok(cmd) = serde_json::from_str::<WsCommand>(&text) {
                    if cmd.action == "refresh" {
                        state.store.run_analysis(&session_id).await;
                        info!("WebSocket refresh requested: session={}", session_id);
                    }
                }
            }
            Ok(Some(Ok(Message::Close(_)))) | Ok(None) => break,
            Ok(Some(Err(e))) => {
                warn!("WebSocket receive error: session={} err={}", session_id, e);
                break;
            }
            Ok(Some(Ok(_))) => {} // ignore pings/binary
            Err(_) => {}          // poll tick, no client message
        }

        let insights = match state.store.insights_or_analyze(&session_id).await {
            Some(insights) => insights,
            None => continue, // session not created yet, keep polling
        };

        if insights.total_insights != last_count {
            last_count = insights.total_insights;
            let payload = match serde_json::to_string(&insights) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to serialize insights: {}", e);
                    continue;
                }
            };
            if socket.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    }

    info!("WebSocket disconnected: session={}", session_id);
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
/// Lightweight probe for load balancers and uptime monitors.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let uptime = Utc::now().signed_duration_since(state.started_at);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.environment.clone(),
            started_at: state.started_at.to_rfc3339(),
            uptime_seconds: (uptime.num_milliseconds() as f64 / 10.0).round() / 100.0,
        }),
    )
        .into_response()
}
