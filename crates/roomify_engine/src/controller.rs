use std::sync::Arc;

use roomify_core::{
    update, CandidateFile, DataUrl, Effect, Msg, SessionToken, SettingsError, UploadSettings,
    UploadState, UploadView,
};
use roomify_logging::{roomify_debug, roomify_error, roomify_info, roomify_warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    AuthContext, DataUrlDecoder, Decoder, LogNotifier, Navigator, Notifier, ProgressHandle,
    ProgressSimulator, RouteIdGenerator,
};

/// Called with the decoded payload once per successful session, before navigation.
pub type CompletionCallback = Box<dyn FnMut(&DataUrl) + Send>;

/// Work spawned on behalf of the live session. At most one exists at a time.
struct SessionTasks {
    session: SessionToken,
    cancel: CancellationToken,
    progress: Option<ProgressHandle>,
}

impl SessionTasks {
    fn cancel(self) {
        self.cancel.cancel();
        if let Some(progress) = self.progress {
            progress.cancel();
        }
    }
}

/// Drives the upload state machine: feeds user events and asynchronous results
/// through [`update`] and executes the resulting effects.
///
/// All state is owned here and mutated from a single task. Decodes, progress
/// ticks and the redirect delay run as spawned tasks that only send messages
/// back; the controller applies them in [`next_event`](Self::next_event).
pub struct IngestionController {
    state: UploadState,
    settings: UploadSettings,
    auth: Arc<dyn AuthContext>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    decoder: Arc<dyn Decoder>,
    simulator: ProgressSimulator,
    route_ids: Arc<RouteIdGenerator>,
    on_complete: Option<CompletionCallback>,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    tasks: Option<SessionTasks>,
}

impl IngestionController {
    pub fn new(
        settings: UploadSettings,
        auth: Arc<dyn AuthContext>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            state: UploadState::new(&settings),
            decoder: Arc::new(DataUrlDecoder::new(settings.max_file_bytes)),
            simulator: ProgressSimulator::from_settings(&settings),
            settings,
            auth,
            navigator,
            notifier: Arc::new(LogNotifier),
            route_ids: Arc::new(RouteIdGenerator::new()),
            on_complete: None,
            msg_tx,
            msg_rx,
            tasks: None,
        };
        controller.sync_auth();
        controller.state.consume_dirty();
        Ok(controller)
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_route_ids(mut self, route_ids: Arc<RouteIdGenerator>) -> Self {
        self.route_ids = route_ids;
        self
    }

    pub fn on_complete(mut self, callback: impl FnMut(&DataUrl) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn view(&self) -> UploadView {
        self.state.view()
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Returns whether the view changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Re-reads the auth flag. Signing out abandons a live session.
    pub fn sync_auth(&mut self) {
        let signed_in = self.auth.is_signed_in();
        self.dispatch(Msg::AuthChanged(signed_in));
    }

    pub fn pick(&mut self, files: Vec<CandidateFile>) {
        self.sync_auth();
        self.dispatch(Msg::FilesPicked(files));
    }

    pub fn drag_over(&mut self) {
        self.sync_auth();
        self.dispatch(Msg::DragOver);
    }

    pub fn drag_leave(&mut self) {
        self.dispatch(Msg::DragLeave);
    }

    pub fn drop_files(&mut self, files: Vec<CandidateFile>) {
        self.sync_auth();
        self.dispatch(Msg::FilesDropped(files));
    }

    /// Tears the surface down: timers stop and late results are discarded.
    pub fn unmount(&mut self) {
        self.dispatch(Msg::Unmounted);
    }

    /// Waits for the next asynchronous result of the live session and applies it.
    /// Returns `false` once nothing is outstanding.
    pub async fn next_event(&mut self) -> bool {
        if !self.state.has_pending_work() {
            return false;
        }
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.sync_auth();
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Runs the live session until it hands off, fails or is abandoned.
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Alert { message } => {
                    roomify_error!("{}", message);
                    self.notifier.alert(&message);
                }
                Effect::CancelSession { session } => {
                    roomify_info!("Abandoning session {}", session);
                    self.cancel_session(session);
                    roomify_logging::set_session(None);
                }
                Effect::Decode { session, file } => self.spawn_decode(session, file),
                Effect::StartProgress { session } => self.start_progress(session),
                Effect::ScheduleRedirect { session } => self.schedule_redirect(session),
                Effect::Complete { payload } => {
                    if let Some(callback) = self.on_complete.as_mut() {
                        callback(&payload);
                    }
                }
                Effect::Navigate { path, state } => {
                    roomify_info!("Navigating to {} with {}", path, state.file_name);
                    self.tasks = None;
                    self.navigator.navigate(&path, state);
                    roomify_logging::set_session(None);
                }
                Effect::Teardown => {
                    if let Some(tasks) = self.tasks.take() {
                        roomify_debug!("Teardown cancels session {}", tasks.session);
                        tasks.cancel();
                    }
                    roomify_logging::set_session(None);
                }
            }
        }
    }

    fn cancel_session(&mut self, session: SessionToken) {
        if self.tasks.as_ref().is_some_and(|t| t.session == session) {
            if let Some(tasks) = self.tasks.take() {
                tasks.cancel();
            }
        }
    }

    fn spawn_decode(&mut self, session: SessionToken, file: CandidateFile) {
        // Never two live sessions: whatever is still running goes first.
        if let Some(previous) = self.tasks.take() {
            previous.cancel();
        }
        roomify_logging::set_session(Some(session.0));
        roomify_info!("Decoding {} ({})", file.name, file.media_type);

        let cancel = CancellationToken::new();
        self.tasks = Some(SessionTasks {
            session,
            cancel: cancel.clone(),
            progress: None,
        });

        let decoder = self.decoder.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(roomify_logging::with_session(session.0, async move {
            let msg = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = decoder.decode(&file) => match result {
                    Ok(payload) => {
                        roomify_info!("Image uploaded successfully: {}", file.name);
                        Msg::DecodeSucceeded { session, payload }
                    }
                    Err(err) => {
                        roomify_error!("Decode failed: {}", err);
                        Msg::DecodeFailed {
                            session,
                            reason: err.to_string(),
                        }
                    }
                },
            };
            let _ = tx.send(msg);
        }));
    }

    fn start_progress(&mut self, session: SessionToken) {
        let Some(tasks) = self.tasks.as_mut().filter(|t| t.session == session) else {
            roomify_warn!("No tasks for session {}; progress not started", session);
            return;
        };
        if let Some(previous) = tasks.progress.take() {
            previous.cancel();
        }
        let tx = self.msg_tx.clone();
        let handle = self.simulator.start_linked(tasks.cancel.clone(), move |tick| {
            let _ = tx.send(Msg::ProgressTicked { session, tick });
        });
        tasks.progress = Some(handle);
    }

    fn schedule_redirect(&mut self, session: SessionToken) {
        let Some(tasks) = self.tasks.as_mut().filter(|t| t.session == session) else {
            roomify_warn!("No tasks for session {}; redirect not scheduled", session);
            return;
        };
        tasks.progress = None;
        let cancel = tasks.cancel.clone();
        let delay = self.settings.redirect_delay;
        let route_ids = self.route_ids.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(roomify_logging::with_session(session.0, async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let route_id = route_ids.next_id();
                    roomify_debug!("Redirect delay elapsed, route id {}", route_id);
                    let _ = tx.send(Msg::RedirectElapsed { session, route_id });
                }
            }
        }));
    }
}

impl Drop for IngestionController {
    fn drop(&mut self) {
        if let Some(tasks) = self.tasks.take() {
            tasks.cancel();
        }
    }
}
