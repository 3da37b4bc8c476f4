pub mod health;
pub mod thumbnail_upload;
pub mod video_upload;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;
use vidstage_core::AppError;

/// Raw `Authorization` header value, if present and valid UTF-8.
pub(crate) fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid ID".to_string()))
}
