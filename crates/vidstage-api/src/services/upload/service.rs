//! Video upload service
//!
//! Orchestrates one upload: authenticate → authorize → stage → classify → remux → store → persist.
//! Each stage either succeeds or ends the run with the [`AppError`] variant naming it. Staged files
//! are owned by [`StagedFile`] guards, so every exit path leaves the staging directory as it found it.

use std::sync::Arc;

use tokio::io::AsyncRead;
use uuid::Uuid;
use vidstage_core::constants::VIDEO_MP4_CONTENT_TYPE;
use vidstage_core::{AppError, Video};
use vidstage_db::VideoRepository;
use vidstage_processing::{OrientationClassifier, Remuxer, StagedFile, StagingArea};
use vidstage_storage::{plan_thumbnail_key, plan_video_key, Storage};

use crate::auth::JwtService;
use crate::utils::upload::{normalize_mime_type, thumbnail_extension, unsupported_thumbnail_type};

#[derive(Clone)]
pub struct VideoUploadService {
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    classifier: OrientationClassifier,
    remuxer: Arc<dyn Remuxer>,
    staging: StagingArea,
    jwt: JwtService,
}

impl VideoUploadService {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        classifier: OrientationClassifier,
        remuxer: Arc<dyn Remuxer>,
        staging: StagingArea,
        jwt: JwtService,
    ) -> Self {
        Self {
            videos,
            storage,
            classifier,
            remuxer,
            staging,
            jwt,
        }
    }

    /// Resolve the caller and load a video they own.
    ///
    /// Must complete before any byte of the request body is read.
    #[tracing::instrument(skip(self, authorization))]
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        video_id: Uuid,
    ) -> Result<Video, AppError> {
        let user_id = self.jwt.authenticate(authorization)?;

        let video = self
            .videos
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(%user_id, owner = %video.user_id, "Upload rejected: caller does not own video");
            return Err(AppError::Forbidden("Not the video owner".to_string()));
        }

        Ok(video)
    }

    /// Run the pipeline for an authorized `video` and return the updated record.
    #[tracing::instrument(skip(self, video, reader), fields(video_id = %video.id))]
    pub async fn ingest<R>(
        &self,
        mut video: Video,
        content_type: Option<&str>,
        reader: &mut R,
    ) -> Result<Video, AppError>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let declared = content_type.unwrap_or_default();
        if normalize_mime_type(declared) != VIDEO_MP4_CONTENT_TYPE {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type '{}'. Expected {}",
                declared, VIDEO_MP4_CONTENT_TYPE
            )));
        }

        let raw = self
            .staging
            .stage(reader)
            .await
            .map_err(|e| AppError::StagingFailed(e.to_string()))?;

        let class = self
            .classifier
            .classify(raw.path())
            .await
            .map_err(|e| AppError::ClassificationFailed(e.to_string()))?;

        let processed = self
            .remuxer
            .remux(raw.path())
            .await
            .map_err(|e| AppError::RemuxFailed(e.to_string()))?;

        let key = plan_video_key(class);
        let url = self
            .storage
            .upload_file(&key, processed.path(), VIDEO_MP4_CONTENT_TYPE)
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        video.set_video_url(url);
        if let Err(e) = self.videos.update(&video).await {
            tracing::warn!(
                storage_key = %key,
                error = %e,
                "Video record update failed; uploaded object left in storage"
            );
            return Err(AppError::PersistFailed(e.to_string()));
        }

        release(processed).await;
        release(raw).await;

        tracing::info!(
            storage_key = %key,
            orientation = %class,
            "Video upload completed"
        );

        Ok(video)
    }

    /// Store a thumbnail for an authorized `video` and return the updated record.
    #[tracing::instrument(skip(self, video, data), fields(video_id = %video.id, size_bytes = data.len()))]
    pub async fn upload_thumbnail(
        &self,
        mut video: Video,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<Video, AppError> {
        let declared = content_type.unwrap_or_default();
        let extension =
            thumbnail_extension(declared).ok_or_else(|| unsupported_thumbnail_type(declared))?;

        let key = plan_thumbnail_key(extension);
        let url = self
            .storage
            .upload_with_key(&key, data, &normalize_mime_type(declared))
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        video.set_thumbnail_url(url);
        if let Err(e) = self.videos.update(&video).await {
            tracing::warn!(
                storage_key = %key,
                error = %e,
                "Thumbnail record update failed; uploaded object left in storage"
            );
            return Err(AppError::PersistFailed(e.to_string()));
        }

        tracing::info!(storage_key = %key, "Thumbnail upload completed");
        Ok(video)
    }
}

async fn release(file: StagedFile) {
    let path = file.path().to_path_buf();
    match tokio::task::spawn_blocking(move || file.release()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged file")
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Staged file cleanup task failed")
        }
    }
}
