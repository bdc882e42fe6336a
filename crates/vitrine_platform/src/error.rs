//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A recorded event sequence could not be decoded
    #[error("Failed to decode events: {0}")]
    Decode(#[from] serde_json::Error),

    /// The event loop stopped abnormally
    #[error("Event loop error: {0}")]
    EventLoop(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
