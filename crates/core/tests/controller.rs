use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;
use viralvantage_core::{
    AnalysisBackend, AnalysisController, AnalysisError, AnalysisRequest, AnalysisState,
    FAILURE_MESSAGE, InputMode, PacingSchedule, Result, VideoMetadata, ViralityReport,
    parse_report,
};

fn report_with_score(score: f64) -> ViralityReport {
    let component = json!({
        "score": 70,
        "label": "Solid",
        "insights": ["Hook lands in the first second"],
        "recommendations": ["Shorten the outro"]
    });
    let value = json!({
        "overallScore": score,
        "metadataScore": component,
        "thumbnailScore": component,
        "videoScore": component,
        "trendScore": component,
        "timelineIssues": [],
        "actionPlan": [
            { "task": "Re-cut the first 3 seconds", "priority": "High", "impact": "Retention" }
        ],
        "generatedAssets": {
            "alternativeTitles": ["A", "B"],
            "descriptionHook": "Hook",
            "optimizedHashtags": ["#fyp"],
            "thumbnailPrompt": "Bright face"
        }
    });
    parse_report(&value.to_string()).unwrap()
}

struct FakeBackend {
    report: Option<ViralityReport>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    modes: Arc<std::sync::Mutex<Vec<InputMode>>>,
}

impl FakeBackend {
    fn succeeding(report: ViralityReport, delay: Duration) -> Self {
        Self {
            report: Some(report),
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
            modes: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            report: None,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            modes: Arc::default(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for FakeBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ViralityReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().unwrap().push(request.mode);
        tokio::time::sleep(self.delay).await;

        self.report
            .clone()
            .ok_or_else(|| AnalysisError::InvalidResponse {
                reason: "connection reset by peer".to_string(),
            })
    }
}

fn with_title(controller: &AnalysisController<FakeBackend>, title: &str) {
    controller.update_metadata(|metadata| metadata.title = title.to_string());
}

#[tokio::test]
async fn blank_title_never_reaches_backend() {
    let backend = FakeBackend::succeeding(report_with_score(87.0), Duration::ZERO);
    let calls = Arc::clone(&backend.calls);
    let controller = AnalysisController::new(backend).with_pacing(PacingSchedule::none());
    with_title(&controller, "   ");

    let state = controller.analyze().await;

    assert_eq!(state.error(), Some("title required"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_report_ends_succeeded_with_score_unchanged() {
    let backend = FakeBackend::succeeding(report_with_score(87.0), Duration::ZERO);
    let modes = Arc::clone(&backend.modes);
    let controller = AnalysisController::new(backend);
    controller.update_metadata(|metadata| {
        metadata.title = "https://youtu.be/abc123".to_string();
        metadata.niche = "Tech/Gadgets".to_string();
    });

    let state = controller.analyze().await;

    assert_eq!(state.progress(), 100);
    assert_eq!(state.report().unwrap().overall_score, 87.0);
    assert_eq!(modes.lock().unwrap().as_slice(), &[InputMode::Url]);
}

#[tokio::test]
async fn backend_failure_shows_generic_message() {
    let controller = AnalysisController::new(FakeBackend::failing());
    with_title(&controller, "My morning routine draft");

    let state = controller.analyze().await;

    let message = state.error().unwrap();
    assert!(!message.is_empty());
    assert_eq!(message, FAILURE_MESSAGE);
    assert!(!message.contains("connection reset"));
}

#[tokio::test]
async fn subscribers_observe_terminal_state() {
    let controller =
        AnalysisController::new(FakeBackend::succeeding(report_with_score(40.0), Duration::ZERO));
    let rx = controller.subscribe();
    with_title(&controller, "draft");

    controller.analyze().await;

    assert!(rx.borrow().is_terminal());
    assert_eq!(rx.borrow().report().unwrap().overall_score, 40.0);
}

#[tokio::test(start_paused = true)]
async fn progress_advances_while_backend_is_pending() {
    let controller = Arc::new(AnalysisController::new(FakeBackend::succeeding(
        report_with_score(87.0),
        Duration::from_secs(10),
    )));
    with_title(&controller, "My morning routine draft");

    let running = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.analyze().await }
    });

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(controller.state().progress(), 20);

    tokio::time::sleep(Duration::from_millis(3000)).await;
    let state = controller.state();
    assert_eq!(state.progress(), 70);
    assert_eq!(state.status_text(), "Drafting the virality action plan...");

    let finished = running.await.unwrap();
    assert_eq!(finished.progress(), 100);
}

#[tokio::test(start_paused = true)]
async fn pacing_never_overwrites_a_finished_analysis() {
    let controller =
        AnalysisController::new(FakeBackend::succeeding(report_with_score(87.0), Duration::ZERO));
    with_title(&controller, "https://www.tiktok.com/@me/video/1");

    controller.analyze().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let state = controller.state();
    assert!(matches!(state, AnalysisState::Succeeded { .. }));
    assert_eq!(state.progress(), 100);
}

#[tokio::test(start_paused = true)]
async fn second_submit_while_analyzing_is_ignored() {
    let backend = FakeBackend::succeeding(report_with_score(87.0), Duration::from_secs(10));
    let calls = Arc::clone(&backend.calls);
    let controller = Arc::new(AnalysisController::new(backend));
    with_title(&controller, "draft");

    let running = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.analyze().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = controller.analyze().await;
    assert!(second.is_analyzing());

    running.await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_in_flight_result() {
    let controller = Arc::new(AnalysisController::new(FakeBackend::succeeding(
        report_with_score(87.0),
        Duration::from_secs(10),
    )));
    controller.update_metadata(|metadata| {
        metadata.title = "https://youtu.be/abc123".to_string();
        metadata.hashtags = vec!["#tech".to_string()];
    });

    let running = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.analyze().await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    controller.reset();

    let finished = running.await.unwrap();
    assert_eq!(finished, AnalysisState::Idle);
    assert_eq!(controller.metadata(), VideoMetadata::default());
}

#[tokio::test]
async fn reset_is_idempotent() {
    let controller = AnalysisController::new(FakeBackend::failing());
    with_title(&controller, "draft");
    controller.analyze().await;

    controller.reset();
    controller.reset();

    assert_eq!(controller.state(), AnalysisState::Idle);
    assert_eq!(controller.metadata(), VideoMetadata::default());
}

#[tokio::test(start_paused = true)]
async fn dropped_analysis_fails_and_frees_the_session() {
    let backend = FakeBackend::succeeding(report_with_score(87.0), Duration::from_secs(60));
    let calls = Arc::clone(&backend.calls);
    let controller = AnalysisController::new(backend);
    with_title(&controller, "https://youtu.be/abc123");

    let timed_out = tokio::time::timeout(Duration::from_secs(5), controller.analyze()).await;
    assert!(timed_out.is_err());

    tokio::time::sleep(Duration::from_secs(120)).await;
    let state = controller.state();
    assert!(!state.is_analyzing());
    assert_eq!(state.error(), Some(FAILURE_MESSAGE));

    let rerun = controller.analyze().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(rerun.report().unwrap().overall_score, 87.0);
}
