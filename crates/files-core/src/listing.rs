//! Paginated listing on top of the store's native prefix scan

use crate::{CoreError, ListQuery, ObjectRecord, PageToken, Result};
use files_store::{ObjectStore, StoreError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// One page of listing results
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListPage {
    /// Records in store scan order
    pub records: Vec<ObjectRecord>,
    /// Present only when the store reports more matching keys
    pub next_page_token: Option<PageToken>,
}

/// Turns a [`ListQuery`] into exactly one store scan.
///
/// Records are passed through in the order the store yields them. Whether
/// another page exists is the store's call; a full page is not taken as a
/// hint. Store failures are returned as-is without retrying, except a
/// continuation token the store refuses, which is the caller's fault.
pub struct ListingContract<S: ObjectStore> {
    store: Arc<S>,
}

impl<S: ObjectStore> Clone for ListingContract<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ObjectStore> ListingContract<S> {
    /// Create a listing contract over a store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch one page
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<ListPage> {
        let (prefix, cursor) = match query {
            ListQuery::Fresh { directory, .. } => (directory.as_str(), None),
            ListQuery::Continuation { page_token, .. } => {
                (page_token.prefix(), Some(page_token.cursor()))
            }
        };

        let listing = self
            .store
            .list(prefix, cursor, query.limit())
            .await
            .map_err(|err| match (err, query) {
                (
                    StoreError::InvalidContinuationToken(_),
                    ListQuery::Continuation { page_token, .. },
                ) => CoreError::invalid(PageToken::rejection(&page_token.encode())),
                (err, _) => CoreError::from(err),
            })?;

        let next_page_token = listing
            .next_continuation_token
            .map(|native| PageToken::new(prefix, native));

        debug!(
            prefix = %prefix,
            count = listing.objects.len(),
            has_more = next_page_token.is_some(),
            "Listed page"
        );

        Ok(ListPage {
            records: listing.objects.into_iter().map(ObjectRecord::from).collect(),
            next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageSize;
    use async_trait::async_trait;
    use bytes::Bytes;
    use files_store::{
        MemoryObjectStore, ObjectData, ObjectHead, ObjectListing, ObjectSummary, StoreError,
    };
    use parking_lot::Mutex;

    async fn contract_with(keys: &[&str]) -> ListingContract<MemoryObjectStore> {
        let store = MemoryObjectStore::new("test-bucket");
        for key in keys {
            store
                .put(key, Bytes::from_static(b"test content!"), "text/plain")
                .await
                .unwrap();
        }
        ListingContract::new(Arc::new(store))
    }

    fn keys(page: &ListPage) -> Vec<&str> {
        page.records.iter().map(|r| r.key.as_str()).collect()
    }

    fn five_keys() -> Vec<String> {
        (1..=5).map(|i| format!("testfile_{i}.txt")).collect()
    }

    #[tokio::test]
    async fn test_directory_scenario() {
        let contract = contract_with(&["dir1/a.txt", "dir1/b.txt", "dir2/c.txt"]).await;

        let page = contract
            .list(&ListQuery::fresh("dir1/", PageSize::default()))
            .await
            .unwrap();

        assert_eq!(keys(&page), ["dir1/a.txt", "dir1/b.txt"]);
        assert_eq!(page.next_page_token, None);
    }

    #[tokio::test]
    async fn test_pages_of_two_cover_five_keys() {
        let all = five_keys();
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let contract = contract_with(&refs).await;

        let first = contract
            .list(&ListQuery::Fresh { directory: String::new(), limit: 2 })
            .await
            .unwrap();
        let second = contract
            .list(&ListQuery::Continuation {
                page_token: first.next_page_token.clone().unwrap(),
                limit: 2,
            })
            .await
            .unwrap();
        let third = contract
            .list(&ListQuery::Continuation {
                page_token: second.next_page_token.clone().unwrap(),
                limit: 2,
            })
            .await
            .unwrap();

        assert_eq!(first.records.len(), 2);
        assert_eq!(second.records.len(), 2);
        assert_eq!(third.records.len(), 1);
        assert_eq!(third.next_page_token, None);

        let seen: Vec<&str> = [&first, &second, &third]
            .into_iter()
            .flat_map(|p| p.records.iter().map(|r| r.key.as_str()))
            .collect();
        assert_eq!(seen, refs);
    }

    #[tokio::test]
    async fn test_limit_is_fresh_on_every_call() {
        let all = five_keys();
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        let contract = contract_with(&refs).await;

        let first = contract
            .list(&ListQuery::Fresh { directory: String::new(), limit: 3 })
            .await
            .unwrap();
        assert_eq!(keys(&first), ["testfile_1.txt", "testfile_2.txt", "testfile_3.txt"]);

        let second = contract
            .list(&ListQuery::Continuation {
                page_token: first.next_page_token.unwrap(),
                limit: 1,
            })
            .await
            .unwrap();
        assert_eq!(keys(&second), ["testfile_4.txt"]);

        let third = contract
            .list(&ListQuery::Continuation {
                page_token: second.next_page_token.unwrap(),
                limit: 2,
            })
            .await
            .unwrap();
        assert_eq!(keys(&third), ["testfile_5.txt"]);
        assert_eq!(third.next_page_token, None);
    }

    #[tokio::test]
    async fn test_exact_fit_yields_no_token() {
        let keys_10: Vec<String> = (0..10).map(|i| format!("k{i:02}")).collect();
        let refs: Vec<&str> = keys_10.iter().map(String::as_str).collect();
        let contract = contract_with(&refs).await;

        let page = contract
            .list(&ListQuery::fresh("", PageSize::default()))
            .await
            .unwrap();
        assert_eq!(page.records.len(), 10);
        assert_eq!(page.next_page_token, None);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_page() {
        let contract = contract_with(&["dir1/a.txt"]).await;

        let page = contract
            .list(&ListQuery::fresh("nothing/", PageSize::default()))
            .await
            .unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[tokio::test]
    async fn test_continuation_stays_in_directory() {
        let contract = contract_with(&["a/1", "a/2", "a/3", "b/1"]).await;

        let first = contract
            .list(&ListQuery::Fresh { directory: "a/".to_string(), limit: 2 })
            .await
            .unwrap();
        let token = first.next_page_token.unwrap();
        assert_eq!(token.prefix(), "a/");

        let second = contract
            .list(&ListQuery::Continuation { page_token: token, limit: 10 })
            .await
            .unwrap();
        assert_eq!(keys(&second), ["a/3"]);
    }

    /// Store that returns a fixed, deliberately unsorted page
    struct ScriptedStore {
        calls: Mutex<Vec<(String, Option<String>, u32)>>,
    }

    #[async_trait]
    impl ObjectStore for ScriptedStore {
        async fn put(&self, _: &str, _: Bytes, _: &str) -> files_store::Result<()> {
            unreachable!()
        }
        async fn get(&self, _: &str) -> files_store::Result<ObjectData> {
            unreachable!()
        }
        async fn head(&self, _: &str) -> files_store::Result<ObjectHead> {
            unreachable!()
        }
        async fn delete(&self, _: &str) -> files_store::Result<()> {
            unreachable!()
        }
        async fn list(
            &self,
            prefix: &str,
            continuation_token: Option<&str>,
            max_keys: u32,
        ) -> files_store::Result<ObjectListing> {
            self.calls.lock().push((
                prefix.to_string(),
                continuation_token.map(str::to_string),
                max_keys,
            ));
            let summary = |key: &str| ObjectSummary {
                key: key.to_string(),
                size: 1,
                last_modified: chrono::Utc::now(),
            };
            Ok(ObjectListing {
                objects: vec![summary("z"), summary("a")],
                next_continuation_token: Some("native-token".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_store_order_and_arguments_pass_through() {
        let store = Arc::new(ScriptedStore { calls: Mutex::new(Vec::new()) });
        let contract = ListingContract::new(Arc::clone(&store));

        let page = contract
            .list(&ListQuery::resume(PageToken::new("p/", "cursor-1"), PageSize::default()))
            .await
            .unwrap();

        assert_eq!(keys(&page), ["z", "a"]);
        assert_eq!(page.next_page_token, Some(PageToken::new("p/", "native-token")));
        assert_eq!(
            store.calls.lock().as_slice(),
            [("p/".to_string(), Some("cursor-1".to_string()), 10)]
        );
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = MemoryObjectStore::new("gone");
        store.remove_bucket();
        let contract = ListingContract::new(Arc::new(store));

        let err = contract
            .list(&ListQuery::fresh("", PageSize::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Upstream(StoreError::BucketNotFound(_))));
    }

    /// Store that only recognises the cursors it issued itself
    struct StrictCursorStore;

    #[async_trait]
    impl ObjectStore for StrictCursorStore {
        async fn put(&self, _: &str, _: Bytes, _: &str) -> files_store::Result<()> {
            unreachable!()
        }
        async fn get(&self, _: &str) -> files_store::Result<ObjectData> {
            unreachable!()
        }
        async fn head(&self, _: &str) -> files_store::Result<ObjectHead> {
            unreachable!()
        }
        async fn delete(&self, _: &str) -> files_store::Result<()> {
            unreachable!()
        }
        async fn list(
            &self,
            _: &str,
            continuation_token: Option<&str>,
            _: u32,
        ) -> files_store::Result<ObjectListing> {
            match continuation_token {
                Some("issued") | None => Ok(ObjectListing {
                    objects: Vec::new(),
                    next_continuation_token: None,
                }),
                Some(other) => Err(StoreError::InvalidContinuationToken(other.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_refused_cursor_is_invalid_query() {
        let contract = ListingContract::new(Arc::new(StrictCursorStore));
        let forged = PageToken::new("dir/", "made-up");

        let err = contract
            .list(&ListQuery::resume(forged.clone(), PageSize::default()))
            .await
            .unwrap_err();
        match err {
            CoreError::InvalidQuery(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].msg.contains("page_token is malformed"));
                assert_eq!(violations[0].input, serde_json::json!(forged.encode()));
            }
            other => panic!("unexpected: {other:?}"),
        }

        let page = contract
            .list(&ListQuery::resume(PageToken::new("dir/", "issued"), PageSize::default()))
            .await
            .unwrap();
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn test_refused_cursor_on_fresh_scan_stays_upstream() {
        struct RefuseAll;

        #[async_trait]
        impl ObjectStore for RefuseAll {
            async fn put(&self, _: &str, _: Bytes, _: &str) -> files_store::Result<()> {
                unreachable!()
            }
            async fn get(&self, _: &str) -> files_store::Result<ObjectData> {
                unreachable!()
            }
            async fn head(&self, _: &str) -> files_store::Result<ObjectHead> {
                unreachable!()
            }
            async fn delete(&self, _: &str) -> files_store::Result<()> {
                unreachable!()
            }
            async fn list(&self, _: &str, _: Option<&str>, _: u32) -> files_store::Result<ObjectListing> {
                Err(StoreError::InvalidContinuationToken(String::new()))
            }
        }

        let contract = ListingContract::new(Arc::new(RefuseAll));
        let err = contract
            .list(&ListQuery::fresh("", PageSize::default()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Upstream(StoreError::InvalidContinuationToken(_))
        ));
    }
}
