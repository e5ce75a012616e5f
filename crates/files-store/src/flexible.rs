//! Object store selected at startup

use crate::{
    MemoryObjectStore, ObjectData, ObjectHead, ObjectListing, ObjectStore, Result, S3ObjectStore,
};
use async_trait::async_trait;
use bytes::Bytes;

/// Either a real S3 bucket or the in-memory fallback
#[derive(Clone)]
pub enum FlexibleObjectStore {
    /// S3 or S3-compatible bucket
    S3(S3ObjectStore),
    /// In-memory storage (development and tests)
    Memory(MemoryObjectStore),
}

impl FlexibleObjectStore {
    /// Check if using real storage or memory
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::S3(_))
    }

    /// Name of the bucket behind this store
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3(store) => store.bucket(),
            Self::Memory(store) => store.bucket(),
        }
    }
}

#[async_trait]
impl ObjectStore for FlexibleObjectStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        match self {
            Self::S3(store) => store.put(key, data, content_type).await,
            Self::Memory(store) => store.put(key, data, content_type).await,
        }
    }

    async fn get(&self, key: &str) -> Result<ObjectData> {
        match self {
            Self::S3(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn head(&self, key: &str) -> Result<ObjectHead> {
        match self {
            Self::S3(store) => store.head(key).await,
            Self::Memory(store) => store.head(key).await,
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self {
            Self::S3(store) => store.exists(key).await,
            Self::Memory(store) => store.exists(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::S3(store) => store.delete(key).await,
            Self::Memory(store) => store.delete(key).await,
        }
    }

    async fn list(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
        max_keys: u32,
    ) -> Result<ObjectListing> {
        match self {
            Self::S3(store) => store.list(prefix, continuation_token, max_keys).await,
            Self::Memory(store) => store.list(prefix, continuation_token, max_keys).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_variant_delegates() {
        let store = FlexibleObjectStore::Memory(MemoryObjectStore::new("flex"));
        assert!(!store.is_persistent());
        assert_eq!(store.bucket(), "flex");

        store
            .put("a.txt", Bytes::from_static(b"hi"), "text/plain")
            .await
            .unwrap();
        assert!(store.exists("a.txt").await.unwrap());
        assert_eq!(store.head("a.txt").await.unwrap().content_length, 2);
    }
}
