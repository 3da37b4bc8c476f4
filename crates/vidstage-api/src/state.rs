//! Application state shared by every handler.

use crate::services::upload::VideoUploadService;

#[derive(Clone)]
pub struct AppState {
    pub uploads: VideoUploadService,
}

impl AppState {
    pub fn new(uploads: VideoUploadService) -> Self {
        Self { uploads }
    }
}
