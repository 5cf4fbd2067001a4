//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One object returned by [`Storage::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Full storage key, e.g. `images/1700000000000-ab.png`
    pub key: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

impl StoredObject {
    /// Last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Storage abstraction trait
///
/// All storage backends (object store, local filesystem) must implement this
/// trait. The pipeline only ever talks to `Arc<dyn Storage>`, so the backend is
/// chosen once at startup and can be swapped for a test double.
///
/// **Key layout:** each backend decides where originals and thumbnails live;
/// callers obtain keys through [`Storage::original_key`] and
/// [`Storage::thumbnail_key`] and never build them by hand.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Storage key of the original named `file_name`.
    fn original_key(&self, file_name: &str) -> String;

    /// Storage key of the thumbnail belonging to the original named `file_name`.
    fn thumbnail_key(&self, file_name: &str) -> String;

    /// Prefix under which originals are listed (`""` for the backend root).
    fn asset_prefix(&self) -> &str;

    /// Write `data` to `key` and return the public URL of the stored object.
    ///
    /// Existing objects under the same key are overwritten.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Enumerate the objects directly under `prefix`.
    ///
    /// Every call performs a fresh enumeration of the backend.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>>;

    /// Delete the object at `key`.
    ///
    /// Deleting a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL under which the object at `key` is served.
    fn url_for(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
