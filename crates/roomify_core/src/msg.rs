use crate::{CandidateFile, DataUrl, ProgressTick, RouteId, SessionToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The auth provider reported a (possibly unchanged) signed-in flag.
    AuthChanged(bool),
    /// User chose files in the picker; only the first one is ingested.
    FilesPicked(Vec<CandidateFile>),
    /// Pointer dragging files entered or moved over the drop zone.
    DragOver,
    /// Pointer left the drop zone.
    DragLeave,
    /// Files were dropped on the drop zone; only the first one is ingested.
    FilesDropped(Vec<CandidateFile>),
    /// Decoder finished reading the session's file.
    DecodeSucceeded {
        session: SessionToken,
        payload: DataUrl,
    },
    /// Decoder could not read the session's file.
    DecodeFailed {
        session: SessionToken,
        reason: String,
    },
    /// Progress simulator tick.
    ProgressTicked {
        session: SessionToken,
        tick: ProgressTick,
    },
    /// Post-completion delay elapsed; carries the id of the destination route.
    RedirectElapsed {
        session: SessionToken,
        route_id: RouteId,
    },
    /// Upload surface was torn down.
    Unmounted,
}
