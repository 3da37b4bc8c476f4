//! Vidstage Processing Library
//!
//! Local media handling for the upload pipeline:
//!
//! - [`staging`]: private temporary files that remove themselves
//! - [`probe`]: stream geometry via `ffprobe` and orientation classification
//! - [`remux`]: fast-start container rewrite via `ffmpeg`

pub mod error;
pub mod probe;
pub mod remux;
pub mod staging;
mod tool;

pub use error::{ProcessingError, ProcessingResult};
pub use probe::{parse_probe_output, FfprobeProbe, MediaProbe, OrientationClassifier, StreamGeometry};
pub use remux::{FfmpegRemuxer, Remuxer};
pub use staging::{StagedFile, StagingArea};
