//! # Files Gateway
//!
//! HTTP facade over a single object store bucket.
//!
//! This crate provides:
//! - **Files API**: upload, list, metadata, download and delete under `/v1/files`
//! - **Error mapping**: JSON bodies for 404, 422 and generic 500 responses
//! - **Configuration**: S3 or in-memory backend selected at startup
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │          (files-client, curl, browsers)             │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                   Files Gateway                     │
//! ├─────────────────────────────────────────────────────┤
//! │  Request ID │ Request Logging │ Panic Catcher       │
//! ├─────────────────────────────────────────────────────┤
//! │                /v1/files Handlers                   │
//! ├─────────────────────────────────────────────────────┤
//! │                    files-core                       │
//! │        (Listing Contract, Object Gateway)           │
//! ├─────────────────────────────────────────────────────┤
//! │                   files-store                       │
//! │               (S3, In-memory)                       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{GatewayConfig, StorageBackend};
pub use error::ApiError;
pub use routes::create_router;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
