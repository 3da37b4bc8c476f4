use std::io;
use thiserror::Error;

/// Errors raised while staging, probing or remuxing a file.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to launch {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Invalid probe output: {0}")]
    InvalidProbeOutput(String),

    #[error("No streams found in probe output")]
    NoStreams,

    #[error("Invalid stream geometry: {width}x{height}")]
    InvalidGeometry { width: u64, height: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;
