#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::{s3::S3Settings, S3Storage};
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use galleria_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(S3Settings {
                bucket,
                region,
                endpoint_url: config.s3_endpoint().map(String::from),
                public_base_url: config.s3_public_base_url().map(String::from),
                public_read: config.s3_public_read(),
            })
            .await?;
            tracing::info!(
                bucket = config.s3_bucket().unwrap_or_default(),
                public_read = config.s3_public_read(),
                "Using object store backend"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(
                config.local_storage_path(),
                config.local_storage_base_url().to_string(),
            )
            .await?;
            tracing::info!(
                path = config.local_storage_path(),
                base_url = config.local_storage_base_url(),
                "Using local filesystem backend"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
