//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p vidstage-api`. No external services are needed: the
//! record store is in memory, storage is a local directory and ffprobe/ffmpeg are scripted.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;
use vidstage_api::auth::JwtClaims;
use vidstage_api::auth::JwtService;
use vidstage_api::setup::routes;
use vidstage_api::{AppState, VideoUploadService};
use vidstage_core::{AppError, Config, StorageBackend, Video};
use vidstage_db::VideoRepository;
use vidstage_processing::{
    MediaProbe, OrientationClassifier, ProcessingError, ProcessingResult, Remuxer, StagedFile,
    StagingArea, StreamGeometry,
};
use vidstage_storage::{LocalStorage, Storage, StorageError, StorageResult};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_BASE_URL: &str = "http://localhost:8091/assets";

/// In-memory record store.
#[derive(Default)]
pub struct MemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: AtomicBool,
}

impl MemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn find(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for MemoryVideoRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.find(id))
    }

    async fn update(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset by peer".to_string()));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(stored) => {
                *stored = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }
}

/// Probe answering with fixed geometry, or failing like ffprobe on a non-video input.
pub struct ScriptedProbe {
    geometry: Option<StreamGeometry>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn with_geometry(width: u32, height: u32) -> Self {
        Self {
            geometry: Some(StreamGeometry { width, height }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            geometry: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProbe for ScriptedProbe {
    async fn probe(&self, path: &Path) -> ProcessingResult<StreamGeometry> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "probe called on a missing staged file");
        self.geometry.ok_or_else(|| ProcessingError::ToolFailed {
            tool: "ffprobe",
            status: "exit status: 1".to_string(),
            stderr: "moov atom not found".to_string(),
        })
    }
}

/// Remuxer that copies its input to a sibling staged file, or fails like ffmpeg would.
pub struct ScriptedRemuxer {
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedRemuxer {
    pub fn copying() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Remuxer for ScriptedRemuxer {
    async fn remux(&self, input: &Path) -> ProcessingResult<StagedFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = StagedFile::sibling(input, "processing")?;
        if self.fail {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        tokio::fs::copy(input, output.path()).await?;
        Ok(output)
    }
}

/// Test application: server plus handles on every fake behind it.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<MemoryVideoRepository>,
    pub probe: Arc<ScriptedProbe>,
    pub remuxer: Arc<ScriptedRemuxer>,
    pub staging_dir: TempDir,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a fresh video record owned by `owner`.
    pub fn seed_video(&self, owner: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Skate session".to_string(),
            description: Some("Raw footage".to_string()),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.insert(video.clone());
        video
    }

    /// Number of entries left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path()).unwrap().count()
    }

    /// Storage keys of every stored object, sorted.
    pub fn stored_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_files(self.storage_dir.path(), self.storage_dir.path(), &mut keys);
        keys.sort();
        keys
    }
}

fn collect_files(root: &Path, dir: &Path, keys: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path: PathBuf = entry.unwrap().path();
        if path.is_dir() {
            collect_files(root, &path, keys);
        } else {
            let key = path.strip_prefix(root).unwrap();
            keys.push(key.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Storage whose every upload fails.
#[derive(Default)]
pub struct FailingStorage {
    calls: AtomicUsize,
}

impl FailingStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_file(
        &self,
        storage_key: &str,
        _path: &Path,
        _content_type: &str,
    ) -> StorageResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::UploadFailed(format!("bucket unreachable for {}", storage_key)))
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::UploadFailed(format!("bucket unreachable for {}", storage_key)))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub fn test_config(staging_dir: &Path, storage_dir: &Path) -> Config {
    Config {
        server_port: 8091,
        environment: "development".to_string(),
        cors_origins: vec!["*".to_string()],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        database_url: "postgres://localhost/vidstage_test".to_string(),
        db_max_connections: 1,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        s3_public_base_url: None,
        local_storage_path: storage_dir.to_string_lossy().into_owned(),
        local_storage_base_url: TEST_BASE_URL.to_string(),
        staging_dir: staging_dir.to_path_buf(),
        ffprobe_path: "ffprobe".to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        max_video_size_bytes: 1024 * 1024,
        max_thumbnail_size_bytes: 64 * 1024,
    }
}

/// Setup test app with a 1280x720 probe and a copying remuxer.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(ScriptedProbe::with_geometry(1280, 720), ScriptedRemuxer::copying(), |_| {})
        .await
}

pub async fn setup_test_app_with(
    probe: ScriptedProbe,
    remuxer: ScriptedRemuxer,
    customize: impl FnOnce(&mut Config),
) -> TestApp {
    let storage_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(storage_dir.path(), TEST_BASE_URL.to_string())
        .await
        .unwrap();
    setup_test_app_with_storage(probe, remuxer, Arc::new(storage), storage_dir, customize)
}

/// Like [`setup_test_app_with`], but uploads go to `storage` instead of `storage_dir`.
pub fn setup_test_app_with_storage(
    probe: ScriptedProbe,
    remuxer: ScriptedRemuxer,
    storage: Arc<dyn Storage>,
    storage_dir: TempDir,
    customize: impl FnOnce(&mut Config),
) -> TestApp {
    let staging_dir = TempDir::new().unwrap();

    let mut config = test_config(staging_dir.path(), storage_dir.path());
    customize(&mut config);

    let videos = Arc::new(MemoryVideoRepository::default());
    let probe = Arc::new(probe);
    let remuxer = Arc::new(remuxer);

    let uploads = VideoUploadService::new(
        videos.clone(),
        storage,
        OrientationClassifier::new(probe.clone()),
        remuxer.clone(),
        StagingArea::new(staging_dir.path()),
        JwtService::new(TEST_JWT_SECRET),
    );

    let state = Arc::new(AppState::new(uploads));
    let router = routes::setup_routes(&config, state).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        videos,
        probe,
        remuxer,
        staging_dir,
        storage_dir,
    }
}

/// Issue a bearer token for `user_id`, valid for an hour.
pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user_id,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}

/// A multipart form with a single file part.
pub fn file_form(field: &str, bytes: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        field.to_string(),
        Part::bytes(bytes).file_name(file_name).mime_type(mime_type),
    )
}

/// Bytes standing in for an mp4 upload. Only the fakes ever look at them.
pub fn fake_mp4(len: usize) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len, 0x42);
    data
}
