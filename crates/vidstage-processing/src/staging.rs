//! Local staging of uploaded files.
//!
//! A [`StagedFile`] owns a private temporary file and deletes it when released or dropped,
//! so a staged path never outlives the request that created it, whichever way that request
//! ends (error, panic, or cancellation of the handler future).

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWriteExt};

const UPLOAD_PREFIX: &str = "upload-";
const MP4_SUFFIX: &str = ".mp4";

/// Directory in which uploads are staged.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `reader` to a new `upload-*.mp4` file in the staging directory.
    ///
    /// On success the file is flushed and its kept handle rewound to byte 0. On failure the
    /// partially written file has already been removed.
    #[tracing::instrument(skip(self, reader), fields(staging_dir = %self.dir.display()))]
    pub async fn stage<R>(&self, reader: &mut R) -> io::Result<StagedFile>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let start = std::time::Instant::now();

        let named = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .suffix(MP4_SUFFIX)
            .tempfile_in(&self.dir)?;
        let (std_file, path) = named.into_parts();
        let mut file = File::from_std(std_file);

        let size = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        file.seek(SeekFrom::Start(0)).await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(StagedFile {
            path,
            file: Some(file),
        })
    }
}

/// A temporary file that is removed when released or dropped.
///
/// Drop unlinks synchronously on the current thread. It only runs on error and cancellation
/// paths, where a single `unlink` is accepted.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    file: Option<File>,
}

impl StagedFile {
    /// Reserve an empty staged path next to `input`, named `<stem>.<tag>-*.mp4`.
    ///
    /// No handle is kept open; the path is meant to be written by an external tool.
    pub fn sibling(input: &Path, tag: &str) -> io::Result<StagedFile> {
        let dir = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "staged".to_string());

        let named = tempfile::Builder::new()
            .prefix(&format!("{}.{}-", stem, tag))
            .suffix(MP4_SUFFIX)
            .tempfile_in(dir)?;
        let (_, path) = named.into_parts();

        Ok(StagedFile { path, file: None })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. A file that is already gone is not an error.
    ///
    /// This is a blocking filesystem call; async callers should run it on the blocking pool.
    pub fn release(self) -> io::Result<()> {
        let StagedFile { path, file } = self;
        drop(file);
        match path.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
