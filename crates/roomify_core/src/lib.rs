//! Roomify core: pure upload ingestion state machine and view-model helpers.
mod effect;
mod file;
mod msg;
mod payload;
mod progress;
mod settings;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, RouteState};
pub use file::{CandidateFile, FileSource};
pub use msg::Msg;
pub use payload::{DataUrl, DataUrlError};
pub use progress::{ProgressCounter, ProgressTick, PROGRESS_COMPLETE};
pub use settings::{SettingsError, UploadSettings};
pub use state::{Phase, RouteId, Session, SessionToken, UploadState};
pub use update::update;
pub use validate::{
    is_acceptable, is_allowed_media_type, ACCEPT_HINT, ALLOWED_MEDIA_TYPES, INVALID_TYPE_MESSAGE,
};
pub use view_model::{
    DropzoneView, NavbarView, StatusView, UploadView, PROMPT_SIGNED_IN, PROMPT_SIGNED_OUT,
    STATUS_ANALYZING, STATUS_REDIRECTING,
};
