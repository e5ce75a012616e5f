//! Request and response types of the files API

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of an upload response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PutFileResponse {
    pub file_path: String,
    pub message: String,
}

/// Outcome of an upload
#[derive(Clone, Debug)]
pub struct UploadResult {
    pub file_path: String,
    pub message: String,
    /// `true` for 201, `false` when an existing file was replaced
    pub created: bool,
}

/// One listed file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_path: String,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: u64,
}

/// One page of a listing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetFilesResponse {
    pub files: Vec<FileMetadata>,
    pub next_page_token: Option<String>,
}

/// Options of a fresh listing
#[derive(Clone, Debug, Default)]
pub struct ListFilesOptions {
    /// Records per page, 10 to 100 inclusive
    pub page_size: Option<u32>,
    /// Key prefix to scan
    pub directory: Option<String>,
}

impl ListFilesOptions {
    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the directory prefix
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// File metadata from a HEAD request
#[derive(Clone, Debug)]
pub struct FileInfo {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// A downloaded file
#[derive(Clone, Debug)]
pub struct FileContent {
    pub info: FileInfo,
    pub data: Bytes,
}
