pub mod config;
pub mod engine;
pub mod http;
pub mod session;

pub use config::Config;
pub use engine::{Insight, InsightEngine, InsightKind, RuleCatalog, SessionInsights};
pub use http::{create_router, AppState};
pub use session::{
    FormattedTranscript, SessionSnapshot, SessionStore, SessionSummary, SpeakerStats,
    TranscriptSegment,
};
