//! UI error types

use thiserror::Error;

/// Errors that can occur in finder operations
#[derive(Debug, Error)]
pub enum UiError {
    /// Error building the finder configuration
    #[error("Failed to build UI configuration: {0}")]
    BuildError(String),

    /// The finder was interrupted before it could report a result
    #[error("UI operation was interrupted")]
    InterruptedError,

    /// IO error during terminal setup or teardown
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for UI operations
pub type Result<T> = std::result::Result<T, UiError>;
