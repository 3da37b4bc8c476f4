//! Running external media tools.

use crate::error::{ProcessingError, ProcessingResult};
use std::ffi::OsStr;
use std::process::{Output, Stdio};
use tokio::process::Command;

const STDERR_TAIL_BYTES: usize = 2048;

/// Reject tool paths carrying shell metacharacters or traversal.
pub(crate) fn validate_tool_path(path: &str) -> ProcessingResult<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }
    if path.contains("..") {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }
    Ok(())
}

/// Run `program` to completion and fail unless it exits successfully.
///
/// The child is not killed if the awaiting future is dropped.
pub(crate) async fn run_tool<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
) -> ProcessingResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ProcessingError::Spawn { tool, source })?;

    if !output.status.success() {
        return Err(ProcessingError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        });
    }

    Ok(output)
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_TAIL_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}
