//! Lifecycle of a single analysis: `Idle -> Analyzing -> Succeeded | Failed`.
//!
//! Every submit hands out a [`Ticket`]. Progress updates and the terminal
//! transition only land while their ticket is still the current one and the
//! session is still analyzing, so a late timer or a response for a request
//! that was reset away can never overwrite newer state.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    compose::{AnalysisRequest, InputMode, Thumbnail, compose},
    error::{AnalysisError, Result},
    progress::{COMPLETE_STATUS, INITIAL_PROGRESS, ProgressStep, initial_status},
    types::{ViralityReport, VideoMetadata},
};

/// Shown for every provider, transport or schema failure. The cause is logged.
pub const FAILURE_MESSAGE: &str =
    "Analysis failed. Make sure the API key is available and the URL is valid.";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing {
        progress: u8,
        status_text: String,
    },
    Succeeded {
        report: Box<ViralityReport>,
    },
    Failed {
        message: String,
    },
}

impl AnalysisState {
    pub fn progress(&self) -> u8 {
        match self {
            AnalysisState::Analyzing { progress, .. } => *progress,
            AnalysisState::Succeeded { .. } => 100,
            AnalysisState::Idle | AnalysisState::Failed { .. } => 0,
        }
    }

    pub fn status_text(&self) -> &str {
        match self {
            AnalysisState::Analyzing { status_text, .. } => status_text.as_str(),
            AnalysisState::Succeeded { .. } => COMPLETE_STATUS,
            AnalysisState::Idle | AnalysisState::Failed { .. } => "",
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, AnalysisState::Analyzing { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisState::Succeeded { .. } | AnalysisState::Failed { .. }
        )
    }

    pub fn report(&self) -> Option<&ViralityReport> {
        match self {
            AnalysisState::Succeeded { report } => Some(&**report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Identity of one submitted analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request_id: Uuid,
    mode: InputMode,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }
}

#[derive(Debug)]
pub enum Submission {
    /// The session is analyzing; the caller must run `request` and report
    /// back with `ticket`.
    Started {
        ticket: Ticket,
        request: AnalysisRequest,
    },
    /// Validation failed; the session is already `Failed`.
    Rejected,
    /// An analysis is already in flight; nothing changed.
    Busy,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    metadata: VideoMetadata,
    thumbnail: Option<Thumbnail>,
    state: AnalysisState,
    generation: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut VideoMetadata {
        &mut self.metadata
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Option<Thumbnail>) {
        self.thumbnail = thumbnail;
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Whether updates for `ticket` would still be applied.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && self.state.is_analyzing()
    }

    pub fn submit(&mut self) -> Submission {
        if self.state.is_analyzing() {
            tracing::debug!("submit ignored: analysis already in flight");
            return Submission::Busy;
        }

        if self.metadata.title.trim().is_empty() {
            self.state = AnalysisState::Failed {
                message: AnalysisError::TitleRequired.to_string(),
            };
            return Submission::Rejected;
        }

        self.generation += 1;
        let request = compose(&self.metadata, self.thumbnail.as_ref());
        let ticket = Ticket {
            generation: self.generation,
            request_id: Uuid::new_v4(),
            mode: request.mode,
        };

        self.state = AnalysisState::Analyzing {
            progress: INITIAL_PROGRESS,
            status_text: initial_status(ticket.mode).to_string(),
        };
        tracing::info!(request_id = %ticket.request_id, mode = ?ticket.mode, "analysis started");

        Submission::Started { ticket, request }
    }

    /// Apply a cosmetic update. Returns `false` once the ticket is stale, the
    /// session has left `Analyzing`, or the step would not move progress
    /// forward.
    pub fn advance(&mut self, ticket: &Ticket, step: &ProgressStep) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if step.progress <= self.state.progress() {
            return false;
        }

        self.state = AnalysisState::Analyzing {
            progress: step.progress,
            status_text: step.status_text.clone(),
        };
        true
    }

    /// Terminal transition for `ticket`. Ignored when the ticket is stale.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<ViralityReport>) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!(request_id = %ticket.request_id, "dropping result of a superseded analysis");
            return false;
        }

        self.state = match result {
            Ok(report) => {
                tracing::info!(
                    request_id = %ticket.request_id,
                    overall_score = report.overall_score,
                    "analysis succeeded"
                );
                AnalysisState::Succeeded {
                    report: Box::new(report),
                }
            }
            Err(err) => {
                tracing::error!(request_id = %ticket.request_id, error = %err, "analysis failed");
                AnalysisState::Failed {
                    message: FAILURE_MESSAGE.to_string(),
                }
            }
        };
        true
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = AnalysisState::Idle;
        self.metadata = VideoMetadata::default();
        self.thumbnail = None;
    }
}
