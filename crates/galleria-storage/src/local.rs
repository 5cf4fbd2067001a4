use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Originals live directly in `base_path`; thumbnails in `base_path/thumbnails`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "uploads")
    /// * `base_url` - Base URL for serving files
    ///   (e.g., "/uploads" or "http://localhost:4000/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        let thumbnails = base_path.join(keys::LOCAL_THUMBNAIL_DIR);
        fs::create_dir_all(&thumbnails).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                thumbnails.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with traversal sequences and, when the target already
    /// exists, keys whose canonical path leaves the base directory (symlinks).
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        keys::validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);

        if let Ok(canonical) = path.canonicalize() {
            let base_canonical = self.base_path.canonicalize().map_err(|e| {
                StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
            })?;
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn original_key(&self, file_name: &str) -> String {
        keys::local_original_key(file_name)
    }

    fn thumbnail_key(&self, file_name: &str) -> String {
        keys::local_thumbnail_key(file_name)
    }

    fn asset_prefix(&self) -> &str {
        ""
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put successful"
        );

        Ok(self.url_for(key))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let dir = if prefix.is_empty() {
            self.base_path.clone()
        } else {
            self.key_to_path(prefix)?
        };
        let start = std::time::Instant::now();

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ListFailed(format!(
                    "Failed to read directory {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::ListFailed(format!("Failed to read directory {}: {}", dir.display(), e))
        })? {
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Skipping unreadable directory entry"
                    );
                    continue;
                }
            };
            // Non UTF-8 names cannot be produced by the naming scheme
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };

            let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
            objects.push(StoredObject {
                key: keys::join(prefix, &file_name),
                size_bytes: metadata.len(),
                last_modified: DateTime::<Utc>::from(modified),
            });
        }

        tracing::debug!(
            path = %dir.display(),
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage list successful"
        );

        Ok(objects)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Local storage delete of missing file");
                return Ok(());
            }
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
