//! # Files Client SDK
//!
//! A typed client for the `/v1/files` API.
//!
//! ## Features
//!
//! - **Uploads**: raw bodies or `multipart/form-data` forms
//! - **Pagination**: follow page tokens as a stream or collect everything
//! - **Typed errors**: 404 and 422 responses become distinct variants
//!
//! ## Example
//!
//! ```rust,ignore
//! use files_client::{FilesClient, ListFilesOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FilesClient::with_endpoint("http://localhost:8000")?;
//!
//!     client.upload("docs/hello.txt", "Hello, World!", Some("text/plain")).await?;
//!
//!     let files = client
//!         .list_all(ListFilesOptions::default().with_directory("docs/"))
//!         .await?;
//!     println!("{} files", files.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::FilesClient;
pub use config::Config;
pub use error::{ClientError, Result, Violation};
pub use types::*;
