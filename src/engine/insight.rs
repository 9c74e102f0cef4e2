use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::rules::{InsightKind, RuleCatalog};
use crate::session::TranscriptSegment;

/// A single detected insight from the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Insight category
    #[serde(rename = "type")]
    pub kind: InsightKind,

    /// Confidence score (0.0 to 1.0) based on keyword match strength
    pub confidence: f64,

    /// The exact transcript text that triggered this insight
    pub matched_text: String,

    /// The keyword/phrase pattern that matched
    pub matched_phrase: String,

    /// Speaker label, if the segment carried one
    pub speaker: Option<String>,

    /// Timestamp inherited from the source segment
    pub timestamp: Option<f64>,

    /// Recommended response or action for the agent
    pub suggestion: String,
}

/// All insights detected for a conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInsights {
    pub session_id: String,
    pub insights: Vec<Insight>,
    pub total_insights: usize,

    /// Count of insights by category
    pub summary: BTreeMap<InsightKind, usize>,
}

/// Rule-based insight detection engine.
///
/// Scans transcript segments against the rule catalog and produces
/// structured `Insight` values. Lowercases each segment's text once and
/// checks plain substring containment; no tokenization, no regex.
#[derive(Debug, Clone)]
pub struct InsightEngine {
    catalog: RuleCatalog,

    /// If > 0, only the most recent N segments are analyzed.
    /// If 0, all segments are analyzed.
    window_size: usize,
}

impl InsightEngine {
    pub fn new(catalog: RuleCatalog, window_size: usize) -> Self {
        Self {
            catalog,
            window_size,
        }
    }

    /// Scan segments for insights.
    ///
    /// `segments` must already be in chronological order. Returns all
    /// detected insights sorted by (timestamp ascending, confidence
    /// descending) together with per-category summary counts. Empty
    /// input yields an empty result, not an error.
    pub fn analyze(&self, segments: &[TranscriptSegment], session_id: &str) -> SessionInsights {
        // Apply sliding window if configured
        let target = if self.window_size > 0 && segments.len() > self.window_size {
            &segments[segments.len() - self.window_size..]
        } else {
            segments
        };

        let mut insights: Vec<Insight> = Vec::new();
        // Dedup key: (category, phrase, timestamp). f64 is not Hash, so
        // the timestamp goes in as its bit pattern.
        let mut seen: HashSet<(InsightKind, &str, u64)> = HashSet::new();

        for segment in target {
            let text_lower = segment.text.to_lowercase();

            for (kind, rule) in self.catalog.iter() {
                if !text_lower.contains(rule.phrase) {
                    continue;
                }
                if !seen.insert((kind, rule.phrase, segment.timestamp.to_bits())) {
                    continue;
                }

                insights.push(Insight {
                    kind,
                    confidence: rule.confidence,
                    matched_text: segment.text.clone(),
                    matched_phrase: rule.phrase.to_string(),
                    speaker: segment.speaker.clone(),
                    timestamp: Some(segment.timestamp),
                    suggestion: rule.suggestion.to_string(),
                });
            }
        }

        // Sort by timestamp, then by confidence descending
        insights.sort_by(|a, b| {
            a.timestamp
                .unwrap_or(0.0)
                .total_cmp(&b.timestamp.unwrap_or(0.0))
                .then(b.confidence.total_cmp(&a.confidence))
        });

        let mut summary: BTreeMap<InsightKind, usize> = BTreeMap::new();
        for insight in &insights {
            *summary.entry(insight.kind).or_default() += 1;
        }

        info!(
            "Insight analysis complete: session={} segments_scanned={} insights_found={}",
            session_id,
            target.len(),
            insights.len()
        );

        SessionInsights {
            session_id: session_id.to_string(),
            total_insights: insights.len(),
            insights,
            summary,
        }
    }
}
