//! Application state

use crate::config::{GatewayConfig, StorageBackend};
use files_core::{ListingContract, ObjectGateway};
use files_store::{FlexibleObjectStore, MemoryObjectStore, S3ObjectStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Paginated listing
    pub listing: ListingContract<FlexibleObjectStore>,
    /// Single-object operations
    pub gateway: ObjectGateway<FlexibleObjectStore>,
}

impl AppState {
    /// Create a new application state, connecting to the configured backend
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let store = match config.backend {
            StorageBackend::Memory => {
                let bucket = if config.bucket.is_empty() {
                    "files"
                } else {
                    config.bucket.as_str()
                };
                FlexibleObjectStore::Memory(MemoryObjectStore::new(bucket))
            }
            StorageBackend::S3 => {
                let store = S3ObjectStore::new(config.s3_store_config()).await?;
                info!("Connected to S3 bucket {}", store.bucket());
                FlexibleObjectStore::S3(store)
            }
        };

        if store.is_persistent() {
            info!(bucket = %store.bucket(), "✓ Storage mode: S3 (persistent)");
        } else {
            warn!(
                bucket = %store.bucket(),
                "⚠ Storage mode: In-memory (NOT persistent - for development only)"
            );
        }

        Ok(Self::with_store(config, store))
    }

    /// Create state around an existing store
    pub fn with_store(config: GatewayConfig, store: FlexibleObjectStore) -> Self {
        let store = Arc::new(store);
        Self {
            config,
            listing: ListingContract::new(Arc::clone(&store)),
            gateway: ObjectGateway::new(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use files_core::{ListQuery, ObjectKey, PageSize, PriorExistence};

    #[tokio::test]
    async fn test_listing_and_gateway_share_one_store() {
        let state = AppState::with_store(
            GatewayConfig::default(),
            FlexibleObjectStore::Memory(MemoryObjectStore::new("test-bucket")),
        );
        let key = ObjectKey::new("dir/a.txt").unwrap();

        let prior = state
            .gateway
            .upload(&key, Bytes::from_static(b"hi"), None)
            .await
            .unwrap();
        assert_eq!(prior, PriorExistence::Created);

        let page = state
            .listing
            .list(&ListQuery::fresh("dir/", PageSize::default()))
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].key, "dir/a.txt");
    }

    #[tokio::test]
    async fn test_memory_backend_defaults_bucket() {
        let config = GatewayConfig {
            backend: StorageBackend::Memory,
            bucket: String::new(),
            ..Default::default()
        };
        let state = AppState::new(config).await.unwrap();
        let key = ObjectKey::new("a.txt").unwrap();
        assert!(!state.gateway.exists(&key).await.unwrap());
    }
}
