use crate::{CandidateFile, DataUrl, SessionToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a blocking, user-visible notice.
    Alert { message: String },
    /// Stop every timer and pending read belonging to `session`.
    CancelSession { session: SessionToken },
    Decode {
        session: SessionToken,
        file: CandidateFile,
    },
    StartProgress { session: SessionToken },
    ScheduleRedirect { session: SessionToken },
    /// Hand the payload to the completion callback, if one is installed.
    Complete { payload: DataUrl },
    Navigate { path: String, state: RouteState },
    /// The surface is gone; cancel everything that is still running.
    Teardown,
}

/// Transient state passed to the destination route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteState {
    pub payload: DataUrl,
    pub file_name: String,
}
