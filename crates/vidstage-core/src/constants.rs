//! Constants shared across crates.

/// The only declared content type accepted by the video upload pipeline.
pub const VIDEO_MP4_CONTENT_TYPE: &str = "video/mp4";

/// Declared content types accepted for thumbnails.
pub const THUMBNAIL_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Multipart field carrying the video body.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Multipart field carrying the thumbnail body.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// Number of random bytes behind every planned object key.
pub const OBJECT_KEY_TOKEN_BYTES: usize = 32;
