use serde::{Deserialize, Serialize};

/// A single transcript segment from the transcription provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text
    pub text: String,

    /// Speaker label, e.g. SPEAKER_01. May be absent when the provider
    /// has no diarization for the segment.
    #[serde(default)]
    pub speaker: Option<String>,

    /// Whether this segment is from the device user (the monitored party)
    #[serde(default)]
    pub is_user: bool,

    /// Unix timestamp of the segment, seconds (may be fractional)
    pub timestamp: f64,
}

impl TranscriptSegment {
    /// Identity under deduplication: timestamp and text must both match
    /// exactly. The timestamp participates as its bit pattern since f64
    /// is not Eq.
    pub fn dedup_key(&self) -> (u64, &str) {
        (self.timestamp.to_bits(), self.text.as_str())
    }

    /// Whitespace-delimited token count of the text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
