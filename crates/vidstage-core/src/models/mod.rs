//! Data models for the application

mod orientation;
mod video;

pub use orientation::OrientationClass;
pub use video::{Video, VideoResponse};
