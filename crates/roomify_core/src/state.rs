use std::fmt;

use crate::view_model::UploadView;
use crate::{CandidateFile, DataUrl, UploadSettings};

/// Identity of one ingestion session. Asynchronous results carry the token of
/// the session that started them; results with any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(pub u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the destination route for a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Decoding,
    Progressing,
    Completing,
    HandedOff,
}

impl Phase {
    /// Whether a timer or read may still deliver messages for this phase.
    pub fn is_live(self) -> bool {
        matches!(self, Phase::Decoding | Phase::Progressing | Phase::Completing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub file: CandidateFile,
    pub payload: Option<DataUrl>,
    pub progress: u8,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadState {
    signed_in: bool,
    dragging: bool,
    session: Option<Session>,
    last_token: u64,
    unmounted: bool,
    route_prefix: String,
    max_file_bytes: u64,
    dirty: bool,
}

impl Default for UploadState {
    fn default() -> Self {
        Self::new(&UploadSettings::default())
    }
}

impl UploadState {
    pub fn new(settings: &UploadSettings) -> Self {
        Self {
            signed_in: false,
            dragging: false,
            session: None,
            last_token: 0,
            unmounted: false,
            // "/" trims to "", which puts destination routes at the root.
            route_prefix: settings.route_prefix.trim_end_matches('/').to_string(),
            max_file_bytes: settings.max_file_bytes,
            dirty: false,
        }
    }

    pub fn view(&self) -> UploadView {
        UploadView::project(self)
    }

    pub fn signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, |s| s.phase)
    }

    pub fn progress(&self) -> u8 {
        self.session.as_ref().map_or(0, |s| s.progress)
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    /// True while a decode, timer or redirect of the current session is outstanding.
    pub fn has_pending_work(&self) -> bool {
        !self.unmounted && self.phase().is_live()
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    pub fn route_path(&self, route_id: &RouteId) -> String {
        format!("{}/{}", self.route_prefix, route_id)
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_signed_in(&mut self, signed_in: bool) {
        self.signed_in = signed_in;
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        if self.dragging != dragging {
            self.dragging = dragging;
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_unmounted(&mut self) {
        self.unmounted = true;
        self.dragging = false;
    }

    /// Replaces the current session with a fresh one in `Decoding`.
    /// Returns the new token and the session it replaced, if any.
    pub(crate) fn begin_session(&mut self, file: CandidateFile) -> (SessionToken, Option<Session>) {
        self.last_token += 1;
        let token = SessionToken(self.last_token);
        let previous = self.session.replace(Session {
            token,
            file,
            payload: None,
            progress: 0,
            phase: Phase::Decoding,
        });
        self.mark_dirty();
        (token, previous)
    }

    pub(crate) fn take_session(&mut self) -> Option<Session> {
        let session = self.session.take();
        if session.is_some() {
            self.mark_dirty();
        }
        session
    }

    /// The current session, but only if it matches `token` and is in `phase`.
    pub(crate) fn current_mut(&mut self, token: SessionToken, phase: Phase) -> Option<&mut Session> {
        self.session
            .as_mut()
            .filter(|s| s.token == token && s.phase == phase)
    }
}
