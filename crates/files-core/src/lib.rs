//! # Files Core
//!
//! The contract between the HTTP layer and the object store.
//!
//! This crate provides:
//! - **Listing Contract**: prefix-scan or continuation paging with opaque tokens
//! - **Object Gateway**: exists, metadata, fetch, upload and delete
//! - **Query model**: page size bounds and the mutually exclusive query modes
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            HTTP Handlers                │
//! ├────────────────────┬────────────────────┤
//! │  ListingContract   │   ObjectGateway    │
//! ├────────────────────┴────────────────────┤
//! │            ObjectStore                  │
//! └─────────────────────────────────────────┘
//! ```

pub mod error;
pub mod gateway;
pub mod listing;
pub mod query;
pub mod types;

pub use error::{CoreError, FieldViolation, Result};
pub use gateway::ObjectGateway;
pub use listing::{ListPage, ListingContract};
pub use query::{
    ListQuery, PageSize, PageToken, RawListParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
pub use types::{ObjectContent, ObjectKey, ObjectMetadata, ObjectRecord, PriorExistence};
