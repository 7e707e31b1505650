use std::io;
use std::path::Path;

use roomify_core::{CandidateFile, DataUrl, FileSource};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{name} is {actual} bytes, larger than the {max_bytes} byte limit")]
    TooLarge {
        name: String,
        max_bytes: u64,
        actual: u64,
    },
}

/// Reads a candidate file and turns it into a text payload.
#[async_trait::async_trait]
pub trait Decoder: Send + Sync {
    async fn decode(&self, file: &CandidateFile) -> Result<DataUrl, DecodeError>;
}

/// Reads the whole file and encodes it as a base64 data URL.
#[derive(Debug, Clone)]
pub struct DataUrlDecoder {
    max_bytes: u64,
}

impl DataUrlDecoder {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    fn check_size(&self, name: &str, actual: u64) -> Result<(), DecodeError> {
        if actual > self.max_bytes {
            return Err(DecodeError::TooLarge {
                name: name.to_string(),
                max_bytes: self.max_bytes,
                actual,
            });
        }
        Ok(())
    }

    async fn read_path(&self, name: &str, path: &Path) -> Result<Vec<u8>, DecodeError> {
        let read_err = |source| DecodeError::Read {
            name: name.to_string(),
            source,
        };
        // Refuse oversized files before pulling them into memory.
        let meta = tokio::fs::metadata(path).await.map_err(read_err)?;
        self.check_size(name, meta.len())?;
        let bytes = tokio::fs::read(path).await.map_err(read_err)?;
        // The file may have grown between the two calls.
        self.check_size(name, bytes.len() as u64)?;
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Decoder for DataUrlDecoder {
    async fn decode(&self, file: &CandidateFile) -> Result<DataUrl, DecodeError> {
        match &file.source {
            FileSource::Path(path) => {
                let bytes = self.read_path(&file.name, path).await?;
                Ok(DataUrl::encode(&file.media_type, &bytes))
            }
            FileSource::Memory(bytes) => {
                self.check_size(&file.name, bytes.len() as u64)?;
                Ok(DataUrl::encode(&file.media_type, bytes))
            }
        }
    }
}
