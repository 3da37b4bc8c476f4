//! Common utilities for file upload handlers

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use vidstage_core::constants::THUMBNAIL_CONTENT_TYPES;
use vidstage_core::AppError;

/// Reduce a declared content type to its bare, lowercase media type.
///
/// `Video/MP4; codecs="avc1"` becomes `video/mp4`. Parameters never take part in matching.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// File extension used in the storage key of a thumbnail with the given declared type.
pub fn thumbnail_extension(content_type: &str) -> Option<&'static str> {
    let mime = normalize_mime_type(content_type);
    match mime.as_str() {
        "image/jpeg" => Some("jpeg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

/// Map a multipart read failure to the error returned to the client.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Error for a declared thumbnail type outside the accepted set.
pub fn unsupported_thumbnail_type(content_type: &str) -> AppError {
    AppError::UnsupportedMediaType(format!(
        "Unsupported thumbnail type '{}'. Allowed: {}",
        content_type,
        THUMBNAIL_CONTENT_TYPES.join(", ")
    ))
}
