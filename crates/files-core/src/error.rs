//! Error types for the files-core crate

use files_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// One rejected input, reported back to the caller as-is
#[derive(Error, Clone, Debug, PartialEq, Serialize)]
#[error("{msg}")]
pub struct FieldViolation {
    /// Human readable reason
    pub msg: String,
    /// The offending input
    pub input: serde_json::Value,
}

impl FieldViolation {
    /// Create a violation for the given input
    pub fn new(msg: impl Into<String>, input: impl Into<serde_json::Value>) -> Self {
        Self {
            msg: msg.into(),
            input: input.into(),
        }
    }
}

/// Errors that can occur in listing and gateway operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// The request was rejected before reaching the store
    #[error("invalid query: {}", describe(.0))]
    InvalidQuery(Vec<FieldViolation>),

    /// Object not found
    #[error("object not found: {0}")]
    NotFound(String),

    /// The store failed (auth, network, missing bucket)
    #[error("upstream store error: {0}")]
    Upstream(#[source] StoreError),
}

impl CoreError {
    /// Shorthand for a single-violation validation failure
    pub fn invalid(violation: FieldViolation) -> Self {
        Self::InvalidQuery(vec![violation])
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(key),
            other => Self::Upstream(other),
        }
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.msg.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
