use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_file(
        &self,
        storage_key: &str,
        path: &Path,
        _content_type: &str,
    ) -> StorageResult<String> {
        let target = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&target).await?;

        let start = std::time::Instant::now();

        let size = fs::copy(path, &target).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                target.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %target.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(storage_key))
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload_with_key successful"
        );

        Ok(self.generate_url(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage_in(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:8091/assets/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_file_copies_into_key_path() {
        let dir = tempdir().unwrap();
        let storage = storage_in(&dir.path().join("assets")).await;

        let source = dir.path().join("source.mp4");
        fs::write(&source, b"fake mp4 bytes").await.unwrap();

        let url = storage
            .upload_file("landscape/token.mp4", &source, "video/mp4")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8091/assets/landscape/token.mp4");
        let stored = fs::read(storage.base_path.join("landscape/token.mp4"))
            .await
            .unwrap();
        assert_eq!(stored, b"fake mp4 bytes");
        // source is left for its owner to clean up
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_upload_file_missing_source_fails() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage
            .upload_file("other/x.mp4", &dir.path().join("gone.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage
            .upload_with_key("../escape.png", vec![1, 2, 3], "image/png")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let source = dir.path().join("source.mp4");
        fs::write(&source, b"x").await.unwrap();
        let result = storage.upload_file("/etc/passwd", &source, "video/mp4").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_upload_with_key_writes_bytes() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let url = storage
            .upload_with_key("thumbnails/t.png", vec![0x89, 0x50], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8091/assets/thumbnails/t.png");
        let stored = fs::read(storage.base_path.join("thumbnails/t.png"))
            .await
            .unwrap();
        assert_eq!(stored, vec![0x89, 0x50]);
    }
}
