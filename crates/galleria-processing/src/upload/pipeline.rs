//! Asset pipeline: validate → name → thumbnail → store.
//!
//! [`AssetPipeline`] is the single entry point for Upload, List and Delete.
//! It owns no mutable state; the storage backend is the only shared state,
//! and every upload writes to keys nobody else uses.

use chrono::Utc;
use futures::future::try_join_all;
use galleria_core::{
    naming, AppError, Asset, AssetListing, DeleteResponse, MediaKind, PipelineConfig,
};
use galleria_storage::{Storage, StorageError, StoredObject};
use std::sync::Arc;
use std::time::Instant;
use subtle::ConstantTimeEq;

use crate::image::generate_thumbnail;
use crate::validator::MediaValidator;

fn write_failed(err: StorageError) -> AppError {
    AppError::BackendWriteFailed(err.to_string())
}

fn read_failed(err: StorageError) -> AppError {
    AppError::BackendReadFailed(err.to_string())
}

/// Whether a listed file name is an original image.
fn is_listable(file_name: &str) -> bool {
    !file_name.starts_with('.')
        && !naming::is_thumbnail(file_name)
        && naming::extension(file_name)
            .and_then(|ext| MediaKind::from_extension(&ext))
            .is_some()
}

/// Write original then thumbnail. If the thumbnail write fails the original
/// is removed again (best effort) so no orphan is left behind.
async fn persist_pair(
    storage: Arc<dyn Storage>,
    kind: MediaKind,
    original_key: String,
    original: Vec<u8>,
    thumbnail_key: String,
    thumbnail: Vec<u8>,
) -> Result<(String, String), AppError> {
    let url = storage
        .put(&original_key, original, kind.mime())
        .await
        .map_err(write_failed)?;

    match storage.put(&thumbnail_key, thumbnail, kind.mime()).await {
        Ok(thumbnail_url) => Ok((url, thumbnail_url)),
        Err(err) => {
            tracing::warn!(
                error = %err,
                key = %thumbnail_key,
                "Thumbnail write failed, removing original"
            );
            if let Err(cleanup_err) = storage.delete(&original_key).await {
                tracing::error!(
                    error = %cleanup_err,
                    key = %original_key,
                    "Failed to clean up original after thumbnail write failure"
                );
            }
            Err(write_failed(err))
        }
    }
}

/// Upload / list / delete over one storage backend.
#[derive(Clone)]
pub struct AssetPipeline {
    storage: Arc<dyn Storage>,
    config: PipelineConfig,
    validator: MediaValidator,
}

impl AssetPipeline {
    pub fn new(storage: Arc<dyn Storage>, config: PipelineConfig) -> Self {
        let validator = MediaValidator::new(config.max_file_size_bytes);
        Self {
            storage,
            config,
            validator,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Accept an upload and persist it with its thumbnail.
    ///
    /// Size and type rejections happen before any storage I/O. The two writes
    /// run in their own task: a caller that goes away mid-upload does not
    /// interrupt them.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn upload(&self, data: Vec<u8>, declared_mime: &str) -> Result<Asset, AppError> {
        let start = Instant::now();
        let size_bytes = data.len() as u64;

        let kind = self.validator.validate_all(&data, declared_mime)?;
        let file_name = naming::generate_file_name(kind);

        let thumbnail = generate_thumbnail(data.clone(), kind).await?;

        let original_key = self.storage.original_key(&file_name);
        let thumbnail_key = self.storage.thumbnail_key(&file_name);

        let task = tokio::spawn(persist_pair(
            self.storage.clone(),
            kind,
            original_key.clone(),
            data,
            thumbnail_key.clone(),
            thumbnail,
        ));
        let (url, thumbnail_url) = task
            .await
            .map_err(|e| AppError::Internal(format!("Upload task failed: {}", e)))??;

        tracing::info!(
            file = %file_name,
            media_type = %kind,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset uploaded"
        );

        Ok(Asset {
            id: file_name,
            extension: kind.extension().to_string(),
            original_key,
            thumbnail_key,
            url,
            thumbnail_url,
            media_type: kind,
            size_bytes,
            created_at: Utc::now(),
        })
    }

    /// List stored originals, most recent first.
    pub async fn list(&self) -> Result<Vec<AssetListing>, AppError> {
        let objects = self
            .storage
            .list(self.storage.asset_prefix())
            .await
            .map_err(read_failed)?;

        let mut entries: Vec<AssetListing> = objects
            .iter()
            .filter(|object| is_listable(object.file_name()))
            .map(|object| self.listing_entry(object))
            .collect();

        if self.config.verify_thumbnails_on_list {
            self.drop_missing_thumbnails(&mut entries).await?;
        }

        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.file.cmp(&a.file)));

        Ok(entries)
    }

    fn listing_entry(&self, object: &StoredObject) -> AssetListing {
        let file = object.file_name().to_string();
        AssetListing {
            url: self.storage.url_for(&object.key),
            thumbnail_url: Some(self.storage.url_for(&self.storage.thumbnail_key(&file))),
            size_bytes: object.size_bytes,
            date: object.last_modified,
            file,
        }
    }

    async fn drop_missing_thumbnails(&self, entries: &mut [AssetListing]) -> Result<(), AppError> {
        let checks = entries.iter().map(|entry| {
            let key = self.storage.thumbnail_key(&entry.file);
            let storage = self.storage.clone();
            async move { storage.exists(&key).await }
        });
        let present = try_join_all(checks).await.map_err(read_failed)?;

        for (entry, exists) in entries.iter_mut().zip(present) {
            if !exists {
                tracing::warn!(file = %entry.file, "Thumbnail missing for listed asset");
                entry.thumbnail_url = None;
            }
        }
        Ok(())
    }

    fn authorize(&self, supplied_key: Option<&str>) -> Result<(), AppError> {
        let Some(expected) = self.config.admin_key.as_deref() else {
            return Ok(());
        };
        let supplied = supplied_key.unwrap_or_default();
        if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Invalid admin key".to_string()))
        }
    }

    /// Delete an original and its thumbnail.
    ///
    /// Missing objects count as deleted. A thumbnail delete failure after the
    /// original is gone is reported but not rolled back.
    pub async fn delete(
        &self,
        id: &str,
        supplied_key: Option<&str>,
    ) -> Result<DeleteResponse, AppError> {
        self.authorize(supplied_key)?;

        if !naming::is_plain_file_name(id) || naming::is_thumbnail(id) {
            return Err(AppError::InvalidInput(format!("Invalid file name: {}", id)));
        }

        for key in [self.storage.original_key(id), self.storage.thumbnail_key(id)] {
            if let Err(err) = self.storage.delete(&key).await {
                tracing::error!(error = %err, key = %key, "Asset delete failed");
                return Err(read_failed(err));
            }
        }

        tracing::info!(file = %id, "Asset deleted");
        Ok(DeleteResponse::ok())
    }
}
