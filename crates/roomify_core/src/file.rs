use std::path::PathBuf;
use std::sync::Arc;

/// Where the bytes of a candidate file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file on disk, read lazily by the decoder.
    Path(PathBuf),
    /// Bytes already held in memory (drag-and-drop hosts, tests).
    Memory(Arc<[u8]>),
}

/// A file handed to the upload surface by the picker or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Display name, e.g. `plan.png`.
    pub name: String,
    /// Media type as declared by the host, e.g. `image/png`.
    pub media_type: String,
    pub source: FileSource,
}

impl CandidateFile {
    pub fn from_path(
        name: impl Into<String>,
        media_type: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source: FileSource::Path(path.into()),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }
}
