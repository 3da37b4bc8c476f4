//! Upload pipeline service
//!
//! Drives a single upload through authorize → stage → classify → remux → store → persist.

mod service;

pub use service::VideoUploadService;
