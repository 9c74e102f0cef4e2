use std::collections::{HashMap, HashSet};

use crate::engine::SessionInsights;

use super::segment::TranscriptSegment;
use super::stats::{
    FormattedTranscript, SessionSnapshot, SessionSummary, SpeakerStats, TranscriptLine,
};

/// Label used when the transcription provider doesn't supply a speaker tag
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

/// All data accumulated for a single conversation session.
///
/// Segments are stored in arrival order; chronological ordering is
/// computed on demand. `segment_count` always equals the number of
/// segments held (nothing is ever deleted), and every stored segment is
/// unique under the (timestamp, text) dedup key.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub session_id: String,
    segments: Vec<TranscriptSegment>,
    segment_count: usize,

    /// Most recent analysis result. Not invalidated when new segments
    /// arrive; callers re-run analysis to refresh it.
    latest_insights: Option<SessionInsights>,
}

impl SessionData {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            segments: Vec::new(),
            segment_count: 0,
            latest_insights: None,
        }
    }

    /// Append new transcript segments and return the count added.
    ///
    /// Deduplication (by timestamp + text) prevents double-processing
    /// when the provider resends the same segments. Arrival order of the
    /// survivors is preserved; no reordering happens at append time.
    pub fn add_segments(&mut self, new_segments: Vec<TranscriptSegment>) -> usize {
        let keep: Vec<bool> = {
            let existing: HashSet<(u64, &str)> =
                self.segments.iter().map(|s| s.dedup_key()).collect();
            new_segments
                .iter()
                .map(|s| !existing.contains(&s.dedup_key()))
                .collect()
        };

        let mut added = 0;
        for (segment, keep) in new_segments.into_iter().zip(keep) {
            if keep {
                self.segments.push(segment);
                added += 1;
            }
        }
        self.segment_count += added;
        added
    }

    /// Segments sorted chronologically by timestamp. The sort is stable,
    /// so segments with equal timestamps keep their arrival order.
    pub fn ordered_segments(&self) -> Vec<TranscriptSegment> {
        let mut ordered = self.segments.clone();
        ordered.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        ordered
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Elapsed seconds from first to last segment, or None if < 2 segments.
    pub fn duration(&self) -> Option<f64> {
        if self.segments.len() < 2 {
            return None;
        }
        let ordered = self.ordered_segments();
        Some(ordered[ordered.len() - 1].timestamp - ordered[0].timestamp)
    }

    /// Normalize speaker labels: absent or blank maps to UNKNOWN.
    fn speaker_label(segment: &TranscriptSegment) -> String {
        match segment.speaker.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => UNKNOWN_SPEAKER.to_string(),
        }
    }

    /// Per-speaker statistics: segment count, word count, talk ratio.
    ///
    /// Talk ratio is the percentage of total words spoken by each
    /// speaker, rounded to one decimal. Speakers appear in order of
    /// first appearance.
    pub fn speaker_stats(&self) -> Vec<SpeakerStats> {
        let mut order: Vec<String> = Vec::new();
        let mut segments_by: HashMap<String, usize> = HashMap::new();
        let mut words_by: HashMap<String, usize> = HashMap::new();

        for seg in &self.segments {
            let label = Self::speaker_label(seg);
            if !segments_by.contains_key(&label) {
                order.push(label.clone());
            }
            *segments_by.entry(label.clone()).or_default() += 1;
            *words_by.entry(label).or_default() += seg.word_count();
        }

        // Avoid division by zero when no words have been spoken
        let total_words = words_by.values().sum::<usize>().max(1);

        order
            .into_iter()
            .map(|speaker| {
                let words = words_by[&speaker];
                SpeakerStats {
                    segment_count: segments_by[&speaker],
                    word_count: words,
                    talk_ratio: ((words as f64 / total_words as f64) * 1000.0).round() / 10.0,
                    speaker,
                }
            })
            .collect()
    }

    /// Build a formatted transcript with speaker-labeled lines.
    ///
    /// Returns both structured lines (for frontends) and a plain-text
    /// rendering (for analysis consumers).
    pub fn formatted_transcript(&self) -> FormattedTranscript {
        let mut lines = Vec::new();
        let mut plain_parts = Vec::new();

        for seg in self.ordered_segments() {
            let label = Self::speaker_label(&seg);
            plain_parts.push(format!("[{}]: {}", label, seg.text));
            lines.push(TranscriptLine {
                speaker: label,
                text: seg.text,
                timestamp: seg.timestamp,
                is_user: seg.is_user,
            });
        }

        FormattedTranscript {
            session_id: self.session_id.clone(),
            lines,
            plain_text: plain_parts.join("\n"),
        }
    }

    /// High-level session summary with speaker stats.
    pub fn summary(&self) -> SessionSummary {
        let total_words = self.segments.iter().map(|s| s.word_count()).sum();
        SessionSummary {
            session_id: self.session_id.clone(),
            total_segments: self.segment_count,
            total_words,
            speakers: self.speaker_stats(),
            duration_seconds: self.duration(),
        }
    }

    /// Raw session detail for API responses.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            segment_count: self.segment_count,
            segments: self.segments.clone(),
        }
    }

    pub fn latest_insights(&self) -> Option<&SessionInsights> {
        self.latest_insights.as_ref()
    }

    pub fn set_latest_insights(&mut self, insights: SessionInsights) {
        self.latest_insights = Some(insights);
    }
}
