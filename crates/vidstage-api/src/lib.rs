//! Vidstage API Library
//!
//! This crate provides the HTTP handlers, the upload pipeline service and application setup.

mod handlers;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::VideoUploadService;
pub use state::AppState;
