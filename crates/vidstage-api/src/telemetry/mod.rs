//! Logging initialization.

mod init;

pub use init::init_telemetry;
