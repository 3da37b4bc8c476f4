use crate::error::HttpAppError;
use crate::handlers::{authorization, parse_video_id};
use crate::state::AppState;
use crate::utils::upload::multipart_error;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use vidstage_core::constants::THUMBNAIL_FORM_FIELD;
use vidstage_core::models::VideoResponse;
use vidstage_core::AppError;

/// `POST /api/thumbnail_upload/{video_id}`
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state
        .uploads
        .authorize(authorization(&headers), video_id)
        .await?;

    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(THUMBNAIL_FORM_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await.map_err(multipart_error)?;

        let video = state
            .uploads
            .upload_thumbnail(video, content_type.as_deref(), data.to_vec())
            .await?;

        return Ok(Json(VideoResponse::from(video)));
    }

    Err(AppError::BadRequest(format!("Missing '{}' field", THUMBNAIL_FORM_FIELD)).into())
}
