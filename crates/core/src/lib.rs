//! ViralVantage Core Library
//!
//! Builds grounded or draft virality analyses for short-form video, sends
//! them to Gemini with a fixed response schema, and tracks one analysis
//! lifecycle at a time.

pub mod backend;
pub mod compose;
pub mod controller;
pub mod error;
pub mod format;
pub mod gemini;
pub mod progress;
pub mod provider;
pub mod schema;
pub mod session;
pub mod types;

// Re-export commonly used items at crate root
pub use backend::AnalysisBackend;
pub use compose::{AnalysisRequest, ContentPart, InputMode, Thumbnail, compose};
pub use controller::AnalysisController;
pub use error::{AnalysisError, Result};
pub use format::{format_report_readable, format_score};
pub use gemini::GeminiClient;
pub use progress::{PacingSchedule, ProgressStep};
pub use provider::ProviderConfig;
pub use schema::{parse_report, report_schema};
pub use session::{AnalysisSession, AnalysisState, FAILURE_MESSAGE, Submission, Ticket};
pub use types::{
    ActionPlanItem, GeneratedAssets, IssueKind, NICHE_PRESETS, Platform, Priority, ScoreBand,
    ScoreComponent, TimelineIssue, VideoMetadata, ViralityReport,
};
