use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pretty_assertions::assert_eq;
use roomify_core::{
    CandidateFile, DataUrl, Phase, RouteState, UploadSettings, INVALID_TYPE_MESSAGE,
    PROMPT_SIGNED_OUT,
};
use roomify_engine::{
    DataUrlDecoder, DecodeError, Decoder, IngestionController, LocalAuth, Navigator, Notifier,
};
use tokio::time::Instant;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(roomify_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Completed(DataUrl),
    Navigated {
        path: String,
        state: RouteState,
        at_ms: u64,
    },
}

struct RecordingNavigator {
    events: Arc<Mutex<Vec<Event>>>,
    start: Instant,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, state: RouteState) {
        self.events.lock().unwrap().push(Event::Navigated {
            path: path.to_string(),
            state,
            at_ms: self.start.elapsed().as_millis() as u64,
        });
    }
}

#[derive(Default)]
struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// Wraps a decoder and counts how often it was asked to run.
struct CountingDecoder {
    inner: DataUrlDecoder,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Decoder for CountingDecoder {
    async fn decode(&self, file: &CandidateFile) -> Result<DataUrl, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.decode(file).await
    }
}

struct FailingDecoder;

#[async_trait::async_trait]
impl Decoder for FailingDecoder {
    async fn decode(&self, file: &CandidateFile) -> Result<DataUrl, DecodeError> {
        Err(DecodeError::Read {
            name: file.name.clone(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission revoked"),
        })
    }
}

struct Harness {
    controller: IngestionController,
    auth: Arc<LocalAuth>,
    events: Arc<Mutex<Vec<Event>>>,
    notifier: Arc<RecordingNotifier>,
    decoder: Arc<CountingDecoder>,
    start: Instant,
}

impl Harness {
    fn new(signed_in: bool) -> Self {
        Self::with_settings(signed_in, UploadSettings::default())
    }

    fn with_settings(signed_in: bool, settings: UploadSettings) -> Self {
        init_logging();
        let auth = Arc::new(if signed_in {
            LocalAuth::signed_in(Some("ada".to_string()))
        } else {
            LocalAuth::new(Some("ada".to_string()))
        });
        let events = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();
        let navigator = Arc::new(RecordingNavigator {
            events: events.clone(),
            start,
        });
        let notifier = Arc::new(RecordingNotifier::default());
        let decoder = Arc::new(CountingDecoder {
            inner: DataUrlDecoder::new(settings.max_file_bytes),
            calls: AtomicUsize::new(0),
        });
        let completed = events.clone();
        let controller = IngestionController::new(settings, auth.clone(), navigator)
            .expect("valid settings")
            .with_notifier(notifier.clone())
            .with_decoder(decoder.clone())
            .on_complete(move |payload| {
                completed
                    .lock()
                    .unwrap()
                    .push(Event::Completed(payload.clone()));
            });
        Self {
            controller,
            auth,
            events,
            notifier,
            decoder,
            start,
        }
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Drives the controller, recording `(ms, progress)` whenever progress changes.
    async fn run_recording_progress(&mut self) -> Vec<(u64, u8)> {
        let mut seen = vec![(self.elapsed_ms(), self.controller.state().progress())];
        while self.controller.next_event().await {
            let progress = self.controller.state().progress();
            if seen.last().map(|(_, p)| *p) != Some(progress) {
                seen.push((self.elapsed_ms(), progress));
            }
        }
        seen
    }
}

fn png(name: &str) -> CandidateFile {
    CandidateFile::from_bytes(name, "image/png", b"\x89PNG".to_vec())
}

#[tokio::test(start_paused = true)]
async fn dropped_png_progresses_then_navigates() {
    let mut h = Harness::new(true);

    h.controller.drag_over();
    assert!(h.controller.view().dropzone.unwrap().dragging);
    h.controller.drop_files(vec![png("plan.png")]);
    assert!(!h.controller.state().dragging());
    assert_eq!(h.controller.state().phase(), Phase::Decoding);

    let seen = h.run_recording_progress().await;

    let mut expected = vec![(0, 0)];
    expected.extend((1..=20u8).map(|i| (u64::from(i) * 100, i * 5)));
    assert_eq!(seen, expected);

    let payload = DataUrl::encode("image/png", b"\x89PNG");
    let events = h.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], Event::Completed(payload.clone()));
    match &events[1] {
        Event::Navigated { path, state, at_ms } => {
            // 20 ticks of 100ms, then the 600ms redirect delay.
            assert_eq!(*at_ms, 2_600);
            let id = path.strip_prefix("/visualizer/").expect("route prefix");
            assert!(id.parse::<i64>().is_ok(), "time-based id: {id}");
            assert_eq!(state.file_name, "plan.png");
            assert_eq!(state.payload, payload);
        }
        other => panic!("expected navigation, got {other:?}"),
    }

    assert_eq!(h.controller.state().phase(), Phase::HandedOff);
    assert_eq!(h.decoder.calls.load(Ordering::SeqCst), 1);
    assert!(h.notifier.alerts.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn pdf_is_rejected_with_alert() {
    let mut h = Harness::new(true);
    let pdf = CandidateFile::from_bytes("brief.pdf", "application/pdf", b"%PDF".to_vec());

    h.controller.pick(vec![pdf]);

    assert_eq!(
        *h.notifier.alerts.lock().unwrap(),
        vec![INVALID_TYPE_MESSAGE.to_string()]
    );
    assert_eq!(h.controller.state().progress(), 0);
    assert_eq!(h.controller.state().phase(), Phase::Idle);
    assert!(!h.controller.next_event().await);
    assert_eq!(h.decoder.calls.load(Ordering::SeqCst), 0);
    assert!(h.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn signed_out_pick_does_nothing() {
    let mut h = Harness::new(false);
    let before = h.controller.state().clone();

    h.controller.pick(vec![png("plan.png")]);
    h.controller.drag_over();
    h.controller.drop_files(vec![png("plan.png")]);

    assert_eq!(*h.controller.state(), before);
    assert!(!h.controller.next_event().await);
    assert_eq!(h.decoder.calls.load(Ordering::SeqCst), 0);
    assert!(h.notifier.alerts.lock().unwrap().is_empty());
    let dropzone = h.controller.view().dropzone.unwrap();
    assert!(!dropzone.enabled);
    assert_eq!(dropzone.prompt, PROMPT_SIGNED_OUT);
}

#[tokio::test(start_paused = true)]
async fn signing_in_enables_intake() {
    let mut h = Harness::new(false);
    h.controller.pick(vec![png("plan.png")]);
    assert_eq!(h.controller.state().phase(), Phase::Idle);

    h.auth.set_signed_in(true);
    h.controller.pick(vec![png("plan.png")]);
    assert_eq!(h.controller.state().phase(), Phase::Decoding);

    h.controller.settle().await;
    assert_eq!(h.events().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn second_ingestion_replaces_first_timer() {
    let mut h = Harness::new(true);
    h.controller.pick(vec![png("first.png")]);
    while h.controller.state().progress() < 30 {
        assert!(h.controller.next_event().await);
    }

    let restarted_at = h.elapsed_ms();
    h.controller.pick(vec![png("second.png")]);
    assert_eq!(h.controller.state().progress(), 0);

    let seen = h.run_recording_progress().await;
    assert!(seen.windows(2).all(|w| w[0].1 <= w[1].1), "{seen:?}");
    // The first timer would have ticked at restarted_at + 100 with 35.
    assert_eq!(seen[1], (restarted_at + 100, 5));
    assert_eq!(seen.last().unwrap().1, 100);

    let navigations: Vec<_> = h
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Navigated { state, .. } => Some(state.file_name),
            Event::Completed(_) => None,
        })
        .collect();
    assert_eq!(navigations, vec!["second.png".to_string()]);

    // Nothing from the first session keeps running.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!h.controller.next_event().await);
    assert_eq!(h.events().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn unmount_mid_progress_freezes_everything() {
    let mut h = Harness::new(true);
    h.controller.drop_files(vec![png("plan.png")]);
    while h.controller.state().progress() < 50 {
        assert!(h.controller.next_event().await);
    }
    let frozen = h.controller.view();

    h.controller.unmount();
    assert!(!h.controller.next_event().await);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.controller.view(), frozen);
    assert!(!h.controller.next_event().await);
    assert!(h.events().is_empty());

    h.controller.pick(vec![png("late.png")]);
    assert_eq!(h.controller.view(), frozen);
}

#[tokio::test(start_paused = true)]
async fn unmount_while_decoding_discards_result() {
    let mut h = Harness::new(true);
    h.controller.pick(vec![png("plan.png")]);
    h.controller.unmount();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.controller.state().phase(), Phase::Decoding);
    assert_eq!(h.controller.state().progress(), 0);
    assert!(!h.controller.next_event().await);
    assert!(h.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn decode_failure_abandons_session() {
    let mut h = Harness::new(true);
    h.controller = IngestionController::new(
        UploadSettings::default(),
        h.auth.clone(),
        Arc::new(RecordingNavigator {
            events: h.events.clone(),
            start: h.start,
        }),
    )
    .unwrap()
    .with_decoder(Arc::new(FailingDecoder));

    h.controller.drop_files(vec![png("plan.png")]);
    h.controller.settle().await;

    assert_eq!(h.controller.state().phase(), Phase::Idle);
    assert_eq!(h.controller.state().progress(), 0);
    assert!(h.controller.view().dropzone.is_some());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn signing_out_mid_progress_abandons_session() {
    let mut h = Harness::new(true);
    h.controller.pick(vec![png("plan.png")]);
    while h.controller.state().progress() < 20 {
        assert!(h.controller.next_event().await);
    }

    h.auth.set_signed_in(false);
    h.controller.settle().await;

    assert!(h.controller.state().session().is_none());
    assert!(!h.controller.state().signed_in());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.events().is_empty());
}

#[tokio::test]
async fn file_on_disk_is_handed_off() {
    let mut tmp = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    tmp.write_all(&[0xff, 0xd8, 0xff]).unwrap();
    tmp.flush().unwrap();

    let settings = UploadSettings {
        tick_interval: Duration::from_millis(1),
        progress_step: 50,
        redirect_delay: Duration::from_millis(1),
        ..UploadSettings::default()
    };
    let mut h = Harness::with_settings(true, settings);
    h.controller
        .pick(vec![CandidateFile::from_path("room.jpg", "image/jpeg", tmp.path())]);
    h.controller.settle().await;

    let events = h.events();
    assert_eq!(events.len(), 2);
    match &events[1] {
        Event::Navigated { state, .. } => {
            assert_eq!(state.file_name, "room.jpg");
            assert_eq!(state.payload.as_str(), "data:image/jpeg;base64,/9j/");
        }
        other => panic!("expected navigation, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_settings_are_refused() {
    let settings = UploadSettings {
        progress_step: 0,
        ..UploadSettings::default()
    };
    let auth = Arc::new(LocalAuth::default());
    let navigator = Arc::new(RecordingNavigator {
        events: Arc::new(Mutex::new(Vec::new())),
        start: Instant::now(),
    });
    assert!(IngestionController::new(settings, auth, navigator).is_err());
}
