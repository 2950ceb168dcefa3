use std::time::Duration;

use crate::compose::InputMode;

pub const INITIAL_PROGRESS: u8 = 5;
pub const COMPLETE_STATUS: &str = "Analysis complete!";

pub fn initial_status(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Url => "Connecting to grounded search...",
        InputMode::Draft => "Initializing analysis engine...",
    }
}

/// One cosmetic progress update, applied `at` after submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressStep {
    pub at: Duration,
    pub progress: u8,
    pub status_text: String,
}

impl ProgressStep {
    pub fn new(at_ms: u64, progress: u8, status_text: impl Into<String>) -> Self {
        Self {
            at: Duration::from_millis(at_ms),
            progress,
            status_text: status_text.into(),
        }
    }
}

/// Per-mode schedule of cosmetic updates shown while the provider works.
#[derive(Clone, Debug)]
pub struct PacingSchedule {
    pub url: Vec<ProgressStep>,
    pub draft: Vec<ProgressStep>,
}

impl Default for PacingSchedule {
    fn default() -> Self {
        Self {
            url: vec![
                ProgressStep::new(800, 20, "Fetching real-time platform data..."),
                ProgressStep::new(2000, 45, "Evaluating the latest niche trends..."),
                ProgressStep::new(3500, 70, "Drafting the virality action plan..."),
            ],
            draft: vec![
                ProgressStep::new(800, 20, "Dissecting metadata structure..."),
                ProgressStep::new(2000, 45, "Evaluating the latest niche trends..."),
                ProgressStep::new(3500, 70, "Drafting the virality action plan..."),
            ],
        }
    }
}

impl PacingSchedule {
    /// No cosmetic updates at all.
    pub fn none() -> Self {
        Self {
            url: Vec::new(),
            draft: Vec::new(),
        }
    }

    pub fn steps(&self, mode: InputMode) -> &[ProgressStep] {
        match mode {
            InputMode::Url => &self.url,
            InputMode::Draft => &self.draft,
        }
    }
}
