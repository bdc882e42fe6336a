//! Error types for vitrine_app

use thiserror::Error;

/// Errors that can occur while setting up or running a page
#[derive(Error, Debug)]
pub enum VitrineError {
    /// Configuration could not be loaded or applied
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform error (event source)
    #[error("Platform error: {0}")]
    Platform(#[from] vitrine_platform::PlatformError),

    /// A configured selector failed to parse
    #[error("Invalid selector: {0}")]
    Selector(#[from] vitrine_layout::SelectorError),

    /// Sending a form failed
    #[error("Mail error: {0}")]
    Mail(#[from] vitrine_widgets::MailError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for VitrineError {
    fn from(err: anyhow::Error) -> Self {
        VitrineError::Other(format!("{err:#}"))
    }
}

/// Result type for vitrine_app operations
pub type Result<T> = std::result::Result<T, VitrineError>;
