use crate::error::HttpAppError;
use crate::handlers::{authorization, parse_video_id};
use crate::state::AppState;
use crate::utils::upload::multipart_error;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use futures::TryStreamExt;
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use vidstage_core::constants::VIDEO_FORM_FIELD;
use vidstage_core::models::VideoResponse;
use vidstage_core::AppError;

/// `POST /api/video_upload/{video_id}`
///
/// The caller is authorized against the record before the multipart body is touched. The
/// `video` field is streamed straight into the staging area; nothing is buffered in memory.
pub async fn upload_video(
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
        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let reader = StreamReader::new(field.map_err(io::Error::other));
        let mut reader = std::pin::pin!(reader);

        let video = state
            .uploads
            .ingest(video, content_type.as_deref(), &mut reader)
            .await?;

        return Ok(Json(VideoResponse::from(video)));
    }

    Err(AppError::BadRequest(format!("Missing '{}' field", VIDEO_FORM_FIELD)).into())
}
