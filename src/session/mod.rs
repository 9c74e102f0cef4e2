//! Conversation session state
//!
//! This module owns everything accumulated for live conversation sessions:
//! - Transcript segment ingestion with (timestamp, text) deduplication
//! - Chronological ordering, computed on demand
//! - Derived analytics: speaker stats, talk ratios, duration
//! - The session registry that routes operations by session id

mod segment;
mod session;
mod stats;
mod store;

pub use segment::TranscriptSegment;
pub use session::{SessionData, UNKNOWN_SPEAKER};
pub use stats::{
    FormattedTranscript, SessionSnapshot, SessionSummary, SpeakerStats, TranscriptLine,
};
pub use store::{SessionStore, StoreStats};
