//! Vidstage Storage Library
//!
//! Object storage for processed media. It includes the Storage trait, S3 and local
//! filesystem backends, and the object key planner.
//!
//! # Storage key format
//!
//! - **Videos**: `{landscape|portrait|other}/{token}.mp4`
//! - **Thumbnails**: `thumbnails/{token}.{jpeg|png}`
//!
//! `token` is 32 random bytes encoded as unpadded URL-safe base64. Keys must not contain
//! `..` or a leading `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{plan_thumbnail_key, plan_video_key, video_key_from_token};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vidstage_core::StorageBackend;
