//! Service and repository wiring

use crate::auth::JwtService;
use crate::services::upload::VideoUploadService;
use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use vidstage_core::Config;
use vidstage_db::PgVideoRepository;
use vidstage_processing::{FfmpegRemuxer, FfprobeProbe, OrientationClassifier, StagingArea};
use vidstage_storage::Storage;

pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let probe = FfprobeProbe::new(config.ffprobe_path.clone()).context("Invalid FFPROBE_PATH")?;
    let remuxer = FfmpegRemuxer::new(config.ffmpeg_path.clone()).context("Invalid FFMPEG_PATH")?;

    let uploads = VideoUploadService::new(
        Arc::new(PgVideoRepository::new(pool)),
        storage,
        OrientationClassifier::new(Arc::new(probe)),
        Arc::new(remuxer),
        StagingArea::new(config.staging_dir.clone()),
        JwtService::new(&config.jwt_secret),
    );

    tracing::info!(
        staging_dir = %config.staging_dir.display(),
        ffprobe_path = %config.ffprobe_path,
        ffmpeg_path = %config.ffmpeg_path,
        "Upload pipeline initialized"
    );

    Ok(Arc::new(AppState::new(uploads)))
}
