//! Raw object shapes as reported by a store backend

use crate::Result;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Streamed object content
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// One entry of a prefix scan
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified timestamp
    pub last_modified: DateTime<Utc>,
}

/// Metadata returned by a head request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHead {
    /// Content type recorded at upload time, if the store kept one
    pub content_type: Option<String>,
    /// Content length in bytes
    pub content_length: u64,
    /// Last modified timestamp
    pub last_modified: DateTime<Utc>,
}

/// Object metadata plus a body stream
pub struct ObjectData {
    pub head: ObjectHead,
    pub body: ByteStream,
}

impl std::fmt::Debug for ObjectData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectData")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// One page of a prefix scan
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectListing {
    /// Entries in store scan order
    pub objects: Vec<ObjectSummary>,
    /// Native continuation token; `None` once the scan is exhausted
    pub next_continuation_token: Option<String>,
}
