//! Database repositories for data access layer
//
// Video records (ownership lookup and media reference updates)
pub mod video;

pub use video::{PgVideoRepository, VideoRepository};
