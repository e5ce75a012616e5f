//! Error types for the files-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during object store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object not found
    #[error("object not found: {0}")]
    NotFound(String),

    /// The configured bucket does not exist
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// The store rejected the request (auth, throttling, malformed request)
    #[error("object store service error: {0}")]
    Service(String),

    /// The store did not recognise a continuation token it was handed back
    #[error("continuation token rejected: {0}")]
    InvalidContinuationToken(String),

    /// Connection or dispatch failure before a response was received
    #[error("transport error: {0}")]
    Transport(String),

    /// Timeout error
    #[error("operation timed out")]
    Timeout,

    /// Reading a response body failed midway
    #[error("body stream error: {0}")]
    Body(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if this is a "not found" error for a single key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
