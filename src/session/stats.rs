use serde::{Deserialize, Serialize};

use super::segment::TranscriptSegment;

/// Aggregated statistics for a single speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerStats {
    pub speaker: String,

    /// Number of segments attributed to this speaker
    pub segment_count: usize,

    /// Total whitespace-delimited words spoken
    pub word_count: usize,

    /// Percentage of total words spoken by this speaker (0–100),
    /// rounded to one decimal
    pub talk_ratio: f64,
}

/// High-level summary of a conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_segments: usize,
    pub total_words: usize,
    pub speakers: Vec<SpeakerStats>,

    /// Elapsed seconds from first to last segment timestamp.
    /// Absent when the session holds fewer than two segments.
    pub duration_seconds: Option<f64>,
}

/// One line of a formatted transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub speaker: String,
    pub text: String,
    pub timestamp: f64,
    pub is_user: bool,
}

/// Full transcript formatted with speaker labels, ordered by timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedTranscript {
    pub session_id: String,

    /// Structured transcript lines for frontends
    pub lines: Vec<TranscriptLine>,

    /// Plain-text rendering (`[label]: text`, newline-joined) for
    /// analysis consumers
    pub plain_text: String,
}

/// Raw session detail returned by the snapshot read path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub segment_count: usize,
    pub segments: Vec<TranscriptSegment>,
}
