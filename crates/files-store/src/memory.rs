//! In-memory object store for testing and development

use crate::{
    ObjectData, ObjectHead, ObjectListing, ObjectStore, ObjectSummary, Result, StoreError,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone, Debug)]
struct StoredObject {
    data: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

impl StoredObject {
    fn head(&self) -> ObjectHead {
        ObjectHead {
            content_type: Some(self.content_type.clone()),
            content_length: self.data.len() as u64,
            last_modified: self.last_modified,
        }
    }
}

/// A single in-memory bucket with lexicographically ordered keys.
///
/// The continuation token is the last key of the previous page.
#[derive(Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: Arc<RwLock<Option<BTreeMap<String, StoredObject>>>>,
}

impl MemoryObjectStore {
    /// Create a new empty bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(Some(BTreeMap::new()))),
        }
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.read().as_ref().map_or(0, BTreeMap::len)
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the bucket and everything in it. Every later call fails with
    /// `StoreError::BucketNotFound` until [`Self::recreate_bucket`] is called.
    pub fn remove_bucket(&self) {
        *self.objects.write() = None;
    }

    /// Recreate a removed bucket, empty
    pub fn recreate_bucket(&self) {
        let mut guard = self.objects.write();
        if guard.is_none() {
            *guard = Some(BTreeMap::new());
        }
    }

    fn missing_bucket(&self) -> StoreError {
        StoreError::BucketNotFound(self.bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let mut guard = self.objects.write();
        let objects = guard.as_mut().ok_or_else(|| self.missing_bucket())?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<ObjectData> {
        let stored = {
            let guard = self.objects.read();
            let objects = guard.as_ref().ok_or_else(|| self.missing_bucket())?;
            objects
                .get(key)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(key.to_string()))?
        };

        let head = stored.head();
        let data = stored.data;
        Ok(ObjectData {
            head,
            body: futures::stream::once(async move { Ok(data) }).boxed(),
        })
    }

    #[instrument(skip(self))]
    async fn head(&self, key: &str) -> Result<ObjectHead> {
        let guard = self.objects.read();
        let objects = guard.as_ref().ok_or_else(|| self.missing_bucket())?;
        objects
            .get(key)
            .map(StoredObject::head)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<()> {
        let mut guard = self.objects.write();
        let objects = guard.as_mut().ok_or_else(|| self.missing_bucket())?;
        objects.remove(key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        max_keys: u32,
    ) -> Result<ObjectListing> {
        let guard = self.objects.read();
        let objects = guard.as_ref().ok_or_else(|| self.missing_bucket())?;

        let start = match continuation_token {
            Some(after) => Bound::Excluded(after.to_string()),
            None => Bound::Included(prefix.to_string()),
        };

        // Keys sharing a prefix are contiguous in a BTreeMap
        let mut matching = objects
            .range::<String, _>((start, Bound::Unbounded))
            .skip_while(|(key, _)| !key.starts_with(prefix))
            .take_while(|(key, _)| key.starts_with(prefix));

        let mut listed = Vec::new();
        for (key, stored) in matching.by_ref().take(max_keys as usize) {
            listed.push(ObjectSummary {
                key: key.clone(),
                size: stored.data.len() as u64,
                last_modified: stored.last_modified,
            });
        }

        let next_continuation_token = match (matching.next(), listed.last()) {
            (Some(_), Some(last)) => Some(last.key.clone()),
            _ => None,
        };

        Ok(ObjectListing {
            objects: listed,
            next_continuation_token,
        })
    }
}
