//! # Files Store
//!
//! Object storage layer for the Files API.
//!
//! This crate provides:
//! - **ObjectStore trait**: put, get, head, exists, delete and prefix listing
//! - **S3 backend**: AWS S3 or any S3-compatible endpoint via `aws-sdk-s3`
//! - **Memory backend**: an ordered in-process bucket for tests and development
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Listing Contract / Gateway       │
//! ├─────────────────────────────────────────┤
//! │            ObjectStore Trait            │
//! ├────────────────────┬────────────────────┤
//! │   S3ObjectStore    │ MemoryObjectStore  │
//! ├────────────────────┴────────────────────┤
//! │        S3 bucket / process memory       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use files_store::{MemoryObjectStore, ObjectStore};
//!
//! let store = MemoryObjectStore::new("my-bucket");
//! store.put("docs/a.txt", data, "text/plain").await?;
//! let page = store.list("docs/", None, 10).await?;
//! ```

pub mod error;
pub mod flexible;
pub mod memory;
pub mod object;
pub mod s3;

pub use error::{Result, StoreError};
pub use flexible::FlexibleObjectStore;
pub use memory::MemoryObjectStore;
pub use object::{ByteStream, ObjectData, ObjectHead, ObjectListing, ObjectSummary};
pub use s3::{S3ObjectStore, S3StoreConfig};

use async_trait::async_trait;
use bytes::Bytes;

/// Content type used when an upload does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Trait for object storage backends.
///
/// Every method maps to exactly one call against the backing store. Retry and
/// timeout policy belongs to the backend's client, never to callers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, replacing any existing one under the same key
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// Retrieve an object with its metadata
    async fn get(&self, key: &str) -> Result<ObjectData>;

    /// Retrieve object metadata without content
    async fn head(&self, key: &str) -> Result<ObjectHead>;

    /// Check if an object exists. Only transport or bucket failures are errors.
    async fn exists(&self, key: &str) -> Result<bool> {
        match self.head(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Delete an object. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// List up to `max_keys` objects whose key starts with `prefix`.
    ///
    /// Without a continuation token the scan starts at the beginning of the
    /// prefix range; with one it resumes where the page that issued it ended.
    async fn list(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        max_keys: u32,
    ) -> Result<ObjectListing>;
}
