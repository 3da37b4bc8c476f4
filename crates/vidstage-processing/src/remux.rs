//! Fast-start remuxing.

use crate::error::ProcessingResult;
use crate::staging::StagedFile;
use crate::tool::{run_tool, validate_tool_path};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;

const PROCESSING_TAG: &str = "processing";

/// Rewrites a container so playback can start before the whole file has arrived.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Remux `input` into a new staged file next to it. `input` is left untouched.
    async fn remux(&self, input: &Path) -> ProcessingResult<StagedFile>;
}

/// [`Remuxer`] backed by the `ffmpeg` binary. Streams are copied, never re-encoded.
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> ProcessingResult<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> ProcessingResult<StagedFile> {
        let start = std::time::Instant::now();
        let output = StagedFile::sibling(input, PROCESSING_TAG)?;

        // -y: the sibling path already exists as an empty placeholder
        run_tool(
            "ffmpeg",
            &self.ffmpeg_path,
            [
                OsStr::new("-y"),
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-c"),
                OsStr::new("copy"),
                OsStr::new("-movflags"),
                OsStr::new("faststart"),
                OsStr::new("-f"),
                OsStr::new("mp4"),
                output.path().as_os_str(),
            ],
        )
        .await?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output.path().display(),
            "Fast-start remux completed"
        );

        Ok(output)
    }
}
