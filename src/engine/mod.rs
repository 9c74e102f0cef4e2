//! Rule-based insight detection
//!
//! Scans transcript segments for keywords and phrases that indicate
//! pricing objections, buying signals, competitor mentions, next-step
//! commitments, and stall tactics.
//!
//! - Each category has an ordered list of (phrase, confidence, suggestion) rules
//! - The engine lowercases text and checks for substring matches
//! - A sliding window can restrict analysis to the most recent segments
//! - Results are deduplicated by (category, phrase, timestamp) so one
//!   segment never produces the same insight twice

mod insight;
mod rules;

pub use insight::{Insight, InsightEngine, SessionInsights};
pub use rules::{InsightKind, Rule, RuleCatalog};
