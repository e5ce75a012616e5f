//! Single-object operations

use crate::{ObjectContent, ObjectKey, ObjectMetadata, PriorExistence, Result};
use bytes::Bytes;
use files_store::{ObjectStore, DEFAULT_CONTENT_TYPE};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Thin operations over one bucket: each maps to a single store call, except
/// `upload`, which checks for a prior object first.
pub struct ObjectGateway<S: ObjectStore> {
    store: Arc<S>,
}

impl<S: ObjectStore> Clone for ObjectGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ObjectStore> ObjectGateway<S> {
    /// Create a gateway over a store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// True iff the store confirms the key is present
    #[instrument(skip(self), fields(key = %key))]
    pub async fn exists(&self, key: &ObjectKey) -> Result<bool> {
        Ok(self.store.exists(key.as_str()).await?)
    }

    /// Metadata only; `CoreError::NotFound` if absent
    #[instrument(skip(self), fields(key = %key))]
    pub async fn metadata(&self, key: &ObjectKey) -> Result<ObjectMetadata> {
        let head = self.store.head(key.as_str()).await?;
        Ok(head.into())
    }

    /// Metadata and streamed content; `CoreError::NotFound` if absent
    #[instrument(skip(self), fields(key = %key))]
    pub async fn fetch(&self, key: &ObjectKey) -> Result<ObjectContent> {
        let object = self.store.get(key.as_str()).await?;
        Ok(ObjectContent {
            metadata: object.head.into(),
            body: object.body,
        })
    }

    /// Write an object and report whether it replaced an existing one.
    ///
    /// The existence check and the write are two separate store calls. A
    /// concurrent writer between them makes the reported value stale.
    #[instrument(skip(self, data), fields(key = %key, size = data.len()))]
    pub async fn upload(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<PriorExistence> {
        let prior = if self.store.exists(key.as_str()).await? {
            PriorExistence::Overwritten
        } else {
            PriorExistence::Created
        };

        let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);
        self.store.put(key.as_str(), data, content_type).await?;

        debug!(?prior, content_type, "Stored object");
        Ok(prior)
    }

    /// Delete an object; deleting an absent key succeeds
    #[instrument(skip(self), fields(key = %key))]
    pub async fn delete(&self, key: &ObjectKey) -> Result<()> {
        Ok(self.store.delete(key.as_str()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use files_store::{MemoryObjectStore, StoreError};
    use futures::TryStreamExt;

    fn gateway() -> (ObjectGateway<MemoryObjectStore>, MemoryObjectStore) {
        let store = MemoryObjectStore::new("test-bucket");
        (ObjectGateway::new(Arc::new(store.clone())), store)
    }

    fn key(k: &str) -> ObjectKey {
        ObjectKey::new(k).unwrap()
    }

    async fn read_all(content: ObjectContent) -> Vec<u8> {
        let chunks: Vec<Bytes> = content.body.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_upload_reports_created_then_overwritten() {
        let (gateway, _) = gateway();
        let k = key("some/nested/file2.txt");

        let first = gateway
            .upload(&k, Bytes::from_static(b"test content2"), Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(first, PriorExistence::Created);

        let second = gateway
            .upload(&k, Bytes::from_static(b"updated content"), Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(second, PriorExistence::Overwritten);

        let content = gateway.fetch(&k).await.unwrap();
        assert_eq!(read_all(content).await, b"updated content");
    }

    #[tokio::test]
    async fn test_upload_keeps_content_type() {
        let (gateway, _) = gateway();
        let k = key("test.txt");

        gateway
            .upload(&k, Bytes::from_static(b"Hello, world!"), Some("text/plain"))
            .await
            .unwrap();

        let metadata = gateway.metadata(&k).await.unwrap();
        assert_eq!(metadata.content_type, "text/plain");
        assert_eq!(metadata.content_length, 13);
    }

    #[tokio::test]
    async fn test_upload_without_content_type() {
        let (gateway, _) = gateway();
        let k = key("blob");

        gateway.upload(&k, Bytes::from_static(b"\x00\x01"), None).await.unwrap();
        let metadata = gateway.metadata(&k).await.unwrap();
        assert_eq!(metadata.content_type, DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_head_scenario() {
        let (gateway, _) = gateway();
        let k = key("a.txt");

        gateway.upload(&k, Bytes::from_static(b"hi"), Some("text/plain")).await.unwrap();

        let metadata = gateway.metadata(&k).await.unwrap();
        assert_eq!(metadata.content_length, 2);
        assert_eq!(metadata.content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let (gateway, _) = gateway();
        let k = key("non_existent_file.txt");

        assert!(!gateway.exists(&k).await.unwrap());
        assert!(matches!(gateway.metadata(&k).await, Err(CoreError::NotFound(_))));
        assert!(matches!(gateway.fetch(&k).await, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_not_an_error() {
        let (gateway, _) = gateway();
        let k = key("doesnotexist.txt");

        assert!(matches!(gateway.metadata(&k).await, Err(CoreError::NotFound(_))));
        gateway.delete(&k).await.unwrap();
        assert!(matches!(gateway.metadata(&k).await, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let (gateway, store) = gateway();
        let k = key("testfile.txt");

        gateway.upload(&k, Bytes::from_static(b"Hello, world!"), None).await.unwrap();
        assert!(gateway.exists(&k).await.unwrap());

        gateway.delete(&k).await.unwrap();
        assert!(!gateway.exists(&k).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_are_upstream() {
        let (gateway, store) = gateway();
        store.remove_bucket();
        let k = key("a.txt");

        assert!(matches!(
            gateway.exists(&k).await,
            Err(CoreError::Upstream(StoreError::BucketNotFound(_)))
        ));
        assert!(matches!(
            gateway.upload(&k, Bytes::new(), None).await,
            Err(CoreError::Upstream(_))
        ));
    }
}
