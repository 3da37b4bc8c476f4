//! Stream geometry probing and orientation classification.

use crate::error::{ProcessingError, ProcessingResult};
use crate::tool::{run_tool, validate_tool_path};
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use vidstage_core::OrientationClass;

/// Pixel dimensions of the first stream in a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamGeometry {
    pub width: u32,
    pub height: u32,
}

/// Reads stream geometry from a file on disk.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> ProcessingResult<StreamGeometry>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u64>,
    height: Option<u64>,
}

/// Parse `ffprobe -print_format json -show_streams` output into the first stream's geometry.
pub fn parse_probe_output(stdout: &[u8]) -> ProcessingResult<StreamGeometry> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::InvalidProbeOutput(e.to_string()))?;

    let stream = output.streams.first().ok_or(ProcessingError::NoStreams)?;
    let width = stream.width.unwrap_or(0);
    let height = stream.height.unwrap_or(0);

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(StreamGeometry {
            width: w,
            height: h,
        }),
        _ => Err(ProcessingError::InvalidGeometry { width, height }),
    }
}

/// [`MediaProbe`] backed by the `ffprobe` binary.
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> ProcessingResult<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> ProcessingResult<StreamGeometry> {
        let start = std::time::Instant::now();

        let output = run_tool(
            "ffprobe",
            &self.ffprobe_path,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_streams"),
                path.as_os_str(),
            ],
        )
        .await?;

        let geometry = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = geometry.width,
            height = geometry.height,
            "Video probe completed"
        );

        Ok(geometry)
    }
}

/// Buckets a staged video into an [`OrientationClass`].
#[derive(Clone)]
pub struct OrientationClassifier {
    probe: Arc<dyn MediaProbe>,
}

impl OrientationClassifier {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        Self { probe }
    }

    #[tracing::instrument(skip(self))]
    pub async fn classify(&self, path: &Path) -> ProcessingResult<OrientationClass> {
        let geometry = self.probe.probe(path).await?;
        let class = OrientationClass::from_dimensions(geometry.width, geometry.height);

        tracing::debug!(
            width = geometry.width,
            height = geometry.height,
            orientation = %class,
            "Video classified"
        );

        Ok(class)
    }
}
