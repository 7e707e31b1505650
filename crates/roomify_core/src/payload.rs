use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("payload does not start with `data:`")]
    MissingScheme,
    #[error("payload is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 body: {0}")]
    InvalidBody(String),
}

/// Self-describing text payload: `data:<media-type>;base64,<body>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    /// Encode raw file bytes. An empty media type falls back to
    /// `application/octet-stream`.
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        let media_type = if media_type.trim().is_empty() {
            FALLBACK_MEDIA_TYPE
        } else {
            media_type.trim()
        };
        let body = STANDARD.encode(bytes);
        Self(format!("{SCHEME}{media_type}{BASE64_MARKER}{body}"))
    }

    /// Accept an existing data URL, checking its shape but not decoding the body.
    pub fn parse(text: impl Into<String>) -> Result<Self, DataUrlError> {
        let text = text.into();
        if !text.starts_with(SCHEME) {
            return Err(DataUrlError::MissingScheme);
        }
        if !text.contains(BASE64_MARKER) {
            return Err(DataUrlError::NotBase64);
        }
        Ok(Self(text))
    }

    pub fn media_type(&self) -> &str {
        let (head, _) = self.split();
        &head[SCHEME.len()..]
    }

    pub fn base64_body(&self) -> &str {
        self.split().1
    }

    /// Recover the original file bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DataUrlError> {
        STANDARD
            .decode(self.base64_body())
            .map_err(|err| DataUrlError::InvalidBody(err.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn split(&self) -> (&str, &str) {
        // Shape is checked on construction.
        self.0
            .split_once(BASE64_MARKER)
            .unwrap_or((SCHEME, ""))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
