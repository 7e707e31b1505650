use crate::{Phase, UploadState, ACCEPT_HINT, PROGRESS_COMPLETE};

pub const PROMPT_SIGNED_IN: &str = "Drag and drop your image here, or click to select a file.";
pub const PROMPT_SIGNED_OUT: &str = "Please sign in to upload files.";
pub const STATUS_ANALYZING: &str = "Analyzing Floor Plan...";
pub const STATUS_REDIRECTING: &str = "Redirecting...";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// What the upload surface shows: the drop zone while no file is held,
/// the status card otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub signed_in: bool,
    pub dropzone: Option<DropzoneView>,
    pub status: Option<StatusView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropzoneView {
    pub dragging: bool,
    /// The picker is disabled while signed out.
    pub enabled: bool,
    pub prompt: &'static str,
    pub help: String,
    pub accept: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub file_name: String,
    pub progress: u8,
    pub complete: bool,
    pub status_text: &'static str,
    pub phase: Phase,
}

impl UploadView {
    pub(crate) fn project(state: &UploadState) -> Self {
        let signed_in = state.signed_in();
        match state.session() {
            None => Self {
                signed_in,
                dropzone: Some(DropzoneView {
                    dragging: state.dragging(),
                    enabled: signed_in,
                    prompt: if signed_in {
                        PROMPT_SIGNED_IN
                    } else {
                        PROMPT_SIGNED_OUT
                    },
                    help: format!(
                        "Maximum file size: {}MB",
                        state.max_file_bytes().div_ceil(BYTES_PER_MB)
                    ),
                    accept: ACCEPT_HINT,
                }),
                status: None,
            },
            Some(session) => {
                let complete = session.progress >= PROGRESS_COMPLETE;
                Self {
                    signed_in,
                    dropzone: None,
                    status: Some(StatusView {
                        file_name: session.file.name.clone(),
                        progress: session.progress,
                        complete,
                        status_text: if complete {
                            STATUS_REDIRECTING
                        } else {
                            STATUS_ANALYZING
                        },
                        phase: session.phase,
                    }),
                }
            }
        }
    }
}

/// Header projection of the auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarView {
    pub brand: &'static str,
    /// `None` while signed out.
    pub greeting: Option<String>,
    pub auth_button: &'static str,
    pub show_get_started: bool,
}

impl NavbarView {
    pub fn from_auth(signed_in: bool, user_name: Option<&str>) -> Self {
        if signed_in {
            let greeting = match user_name.filter(|name| !name.is_empty()) {
                Some(name) => format!("Hi,{name}"),
                None => "Signed in".to_string(),
            };
            Self {
                brand: "Roomify",
                greeting: Some(greeting),
                auth_button: "Log Out",
                show_get_started: false,
            }
        } else {
            Self {
                brand: "Roomify",
                greeting: None,
                auth_button: "Log In",
                show_get_started: true,
            }
        }
    }
}
