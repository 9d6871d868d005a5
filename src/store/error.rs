//! Record store error types
//!
//! All errors implement `std::error::Error` via the `thiserror` crate.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`** / **`EncodeError`**: bincode failures for stored nodes
//! - **`InvalidId`**: An identifier that violates the non-empty invariant
//! - **`FetchError`**: A background fetch task failed to complete

use thiserror::Error;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding node: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding node: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Identifier was empty or otherwise unusable
    #[error("Invalid record id: {0:?}")]
    InvalidId(String),

    /// Asynchronous fetch did not complete
    #[error("Background fetch failed: {0}")]
    FetchError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_id_display() {
        let error = StoreError::InvalidId(String::new());
        assert_eq!(error.to_string(), "Invalid record id: \"\"");
    }

    #[test]
    fn test_fetch_error_display() {
        let error = StoreError::FetchError("task panicked".to_string());
        assert!(error.to_string().contains("task panicked"));
        assert!(error.source().is_none());
    }
}
