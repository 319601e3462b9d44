//! Storage abstraction trait
//!
//! This module defines the trait the lead pipeline uses to stage and re-read
//! attachments.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Create failed: {0}")]
    CreateFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A file persisted for the current submission.
///
/// Once staged, the file is independent of the request: later failures do
/// not remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Location on disk: `{upload_dir}/{storage_name}`
    pub path: PathBuf,
    /// Filename as sent by the client, used when attaching the file to email
    pub original_filename: String,
    /// Media type the client declared for the upload
    pub content_type: Option<String>,
    pub size_bytes: u64,
}

impl StagedFile {
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Path as reported back to the client.
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Storage abstraction trait
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// Persist `data` under a fresh, unique name derived from `original_filename`.
    async fn stage(&self, original_filename: &str, data: Bytes) -> StorageResult<StagedFile>;

    /// Read back a previously staged file.
    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>>;

    /// Directory staged files are written to.
    fn root(&self) -> &Path;
}
