//! Content type lookup by file extension

use crate::object_name::{extension, normalize_extension};

/// Content type for anything not in the table
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    // Documents
    (".pdf", "application/pdf"),
    (".doc", "application/msword"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".xls", "application/vnd.ms-excel"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".ppt", "application/vnd.ms-powerpoint"),
    (
        ".pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    // Text and data
    (".txt", "text/plain"),
    (".csv", "text/csv"),
    (".json", "application/json"),
    (".xml", "application/xml"),
    // Images
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
    (".webp", "image/webp"),
    (".svg", "image/svg+xml"),
    // Audio
    (".mp3", "audio/mpeg"),
    (".wav", "audio/wav"),
    // Video
    (".mp4", "video/mp4"),
    (".avi", "video/x-msvideo"),
    (".mov", "video/quicktime"),
    (".webm", "video/webm"),
    // Archives
    (".zip", "application/zip"),
    (".gz", "application/gzip"),
    (".tar", "application/x-tar"),
];

/// Returns the content type for `extension` (`.pdf`, `PDF` and `pdf` are equivalent).
///
/// Unknown and empty extensions map to [`DEFAULT_CONTENT_TYPE`].
#[must_use]
pub fn content_type_for_extension(extension: &str) -> &'static str {
    let Some(extension) = normalize_extension(extension) else {
        return DEFAULT_CONTENT_TYPE;
    };

    CONTENT_TYPES
        .iter()
        .find(|&&(known, _)| known == extension)
        .map_or(DEFAULT_CONTENT_TYPE, |&(_, content_type)| content_type)
}

/// Returns the content type for the extension of the last segment of `path`
#[must_use]
pub fn content_type_for_path(path: &str) -> &'static str {
    content_type_for_extension(extension(path))
}
