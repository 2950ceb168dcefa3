use std::sync::{Arc, Mutex};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

use crate::{
    backend::AnalysisBackend,
    compose::Thumbnail,
    error::{AnalysisError, Result},
    progress::PacingSchedule,
    session::{AnalysisSession, AnalysisState, Submission, Ticket},
    types::{VideoMetadata, ViralityReport},
};

struct ControllerInner {
    session: Mutex<AnalysisSession>,
    state_tx: watch::Sender<AnalysisState>,
}

impl ControllerInner {
    fn with_session<R>(&self, f: impl FnOnce(&mut AnalysisSession) -> R) -> R {
        let mut session = self.session.lock().expect("AnalysisSession poisoned");
        let out = f(&mut session);
        self.state_tx.send_if_modified(|published| {
            if published != session.state() {
                *published = session.state().clone();
                true
            } else {
                false
            }
        });
        out
    }
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Fails the ticket's analysis if the caller stops awaiting it before the
/// backend resolves.
struct CompleteOnDrop {
    inner: Arc<ControllerInner>,
    ticket: Option<Ticket>,
}

impl CompleteOnDrop {
    fn finish(mut self, result: Result<ViralityReport>) {
        if let Some(ticket) = self.ticket.take() {
            self.inner
                .with_session(|session| session.complete(&ticket, result));
        }
    }
}

impl Drop for CompleteOnDrop {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        if let Some(ticket) = self.ticket.take() {
            tracing::warn!(request_id = %ticket.request_id(), "analysis dropped before the backend responded");
            self.inner.with_session(|session| {
                session.complete(&ticket, Err(AnalysisError::Abandoned))
            });
        }
    }
}

/// Drives one [`AnalysisSession`] against a backend.
///
/// Observers follow the state through [`AnalysisController::subscribe`];
/// cosmetic progress runs on a separate task that is aborted as soon as the
/// backend resolves. Dropping an in-flight `analyze()` future (a timeout,
/// a lost `select!` branch) fails that analysis instead of leaving the
/// session stuck in `Analyzing`.
pub struct AnalysisController<B> {
    inner: Arc<ControllerInner>,
    backend: B,
    pacing: PacingSchedule,
}

impl<B: AnalysisBackend> AnalysisController<B> {
    pub fn new(backend: B) -> Self {
        let (state_tx, _) = watch::channel(AnalysisState::Idle);
        Self {
            inner: Arc::new(ControllerInner {
                session: Mutex::new(AnalysisSession::new()),
                state_tx,
            }),
            backend,
            pacing: PacingSchedule::default(),
        }
    }

    pub fn with_pacing(mut self, pacing: PacingSchedule) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> AnalysisState {
        self.inner.with_session(|session| session.state().clone())
    }

    pub fn metadata(&self) -> VideoMetadata {
        self.inner.with_session(|session| session.metadata().clone())
    }

    pub fn update_metadata(&self, f: impl FnOnce(&mut VideoMetadata)) {
        self.inner.with_session(|session| f(session.metadata_mut()));
    }

    pub fn set_thumbnail(&self, thumbnail: Option<Thumbnail>) {
        self.inner
            .with_session(|session| session.set_thumbnail(thumbnail));
    }

    pub fn reset(&self) {
        self.inner.with_session(AnalysisSession::reset);
    }

    /// Run one analysis with the current metadata and return the state it
    /// ended in. Returns immediately when validation fails or another
    /// analysis is already running.
    pub async fn analyze(&self) -> AnalysisState {
        let (ticket, request) = match self.inner.with_session(AnalysisSession::submit) {
            Submission::Started { ticket, request } => (ticket, request),
            Submission::Rejected | Submission::Busy => return self.state(),
        };

        let pacer = AbortOnDrop(self.spawn_pacer(&ticket));
        let completion = CompleteOnDrop {
            inner: Arc::clone(&self.inner),
            ticket: Some(ticket),
        };
        let result = self.backend.analyze(&request).await;
        drop(pacer);

        completion.finish(result);
        self.state()
    }

    fn spawn_pacer(&self, ticket: &Ticket) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let steps = self.pacing.steps(ticket.mode()).to_vec();
        let ticket = ticket.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            for step in steps {
                sleep_until(started + step.at).await;
                let current = inner.with_session(|session| {
                    session.advance(&ticket, &step);
                    session.is_current(&ticket)
                });
                if !current {
                    break;
                }
            }
        })
    }
}
