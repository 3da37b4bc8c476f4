//! Vidstage record store
//!
//! Repository access to the `videos` table owned by the wider application. Only the reads
//! and writes the upload pipeline needs are exposed.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
