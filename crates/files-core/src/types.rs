//! Object shapes exposed by the gateway and listing contract

use crate::{CoreError, FieldViolation, Result};
use chrono::{DateTime, Utc};
use files_store::{ByteStream, ObjectHead, ObjectSummary, DEFAULT_CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of one object inside the bucket.
///
/// `/` segments read like directories, but the keyspace is flat.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a key; empty keys are rejected
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(CoreError::invalid(FieldViolation::new(
                "String should have at least 1 character",
                key,
            )));
        }
        Ok(Self(key))
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One listed object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: u64,
}

impl From<ObjectSummary> for ObjectRecord {
    fn from(summary: ObjectSummary) -> Self {
        Self {
            key: summary.key,
            last_modified: summary.last_modified,
            size_bytes: summary.size,
        }
    }
}

/// Metadata of a single object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub content_length: u64,
    pub last_modified: DateTime<Utc>,
}

impl From<ObjectHead> for ObjectMetadata {
    fn from(head: ObjectHead) -> Self {
        Self {
            content_type: head
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            content_length: head.content_length,
            last_modified: head.last_modified,
        }
    }
}

/// Object metadata plus its streamed body
pub struct ObjectContent {
    pub metadata: ObjectMetadata,
    pub body: ByteStream,
}

impl fmt::Debug for ObjectContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectContent")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Whether an upload replaced an existing object.
///
/// Determined by an existence check made before the write, so two concurrent
/// uploads of a new key can both report `Created`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorExistence {
    Created,
    Overwritten,
}
