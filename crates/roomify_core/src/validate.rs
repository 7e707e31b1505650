use crate::CandidateFile;

/// Media types the upload surface accepts. `image/jpg` is not registered but
/// some hosts report it for `.jpg` files.
pub const ALLOWED_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Extension filter offered to native file pickers.
pub const ACCEPT_HINT: &str = ".jpg,.jpeg,.png";

pub const INVALID_TYPE_MESSAGE: &str =
    "Invalid file type. Only JPG, JPEG, and PNG files are allowed.";

pub fn is_allowed_media_type(media_type: &str) -> bool {
    ALLOWED_MEDIA_TYPES.contains(&media_type)
}

/// Whether a candidate file may enter ingestion, judged on its declared type.
pub fn is_acceptable(file: &CandidateFile) -> bool {
    is_allowed_media_type(&file.media_type)
}
