use crate::keys;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue};
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ClientOptions, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::sync::Arc;

/// Object store (S3 and S3-compatible) storage implementation
///
/// Originals and thumbnails share the `images/` prefix.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base_url: String,
}

/// Settings for [`S3Storage::new`].
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    pub endpoint_url: Option<String>,
    /// Overrides the URL prefix returned to clients (CDN, custom domain)
    pub public_base_url: Option<String>,
    /// Send `x-amz-acl: public-read` so stored objects are world-readable
    pub public_read: bool,
}

/// Public URL prefix for objects in `bucket`.
///
/// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com
/// For S3-compatible providers, uses path-style: {endpoint}/{bucket}
fn public_base_url(settings: &S3Settings) -> String {
    if let Some(ref base) = settings.public_base_url {
        return base.trim_end_matches('/').to_string();
    }
    match settings.endpoint_url {
        Some(ref endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), settings.bucket),
        None => format!(
            "https://{}.s3.{}.amazonaws.com",
            settings.bucket, settings.region
        ),
    }
}

/// Headers sent with every request, if any.
fn default_headers(public_read: bool) -> Option<HeaderMap> {
    if !public_read {
        return None;
    }
    let mut headers = HeaderMap::new();
    headers.insert("x-amz-acl", HeaderValue::from_static("public-read"));
    Some(headers)
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials are picked up from the environment (`AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY`, instance metadata, ...).
    pub async fn new(settings: S3Settings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(settings.region.clone())
            .with_bucket_name(settings.bucket.clone());

        if let Some(ref endpoint) = settings.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        if let Some(headers) = default_headers(settings.public_read) {
            builder =
                builder.with_client_options(ClientOptions::new().with_default_headers(headers));
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            public_base_url: public_base_url(&settings),
            bucket: settings.bucket,
        })
    }

    /// Wrap an already-built object store, e.g. `object_store::memory::InMemory`.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        S3Storage {
            store,
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn original_key(&self, file_name: &str) -> String {
        keys::object_original_key(file_name)
    }

    fn thumbnail_key(&self, file_name: &str) -> String {
        keys::object_thumbnail_key(file_name)
    }

    fn asset_prefix(&self) -> &str {
        keys::OBJECT_PREFIX
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String> {
        keys::validate_key(key)?;
        let size = data.len() as u64;
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(self.url_for(key))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let start = std::time::Instant::now();
        let location = Path::from(prefix);

        let result: ObjectResult<_> = self.store.list_with_delimiter(Some(&location)).await;

        let listing = result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                prefix = %prefix,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 list failed"
            );
            StorageError::ListFailed(e.to_string())
        })?;

        let objects: Vec<StoredObject> = listing
            .objects
            .into_iter()
            .map(|meta| StoredObject {
                key: meta.location.to_string(),
                size_bytes: meta.size as u64,
                last_modified: meta.last_modified,
            })
            .collect();

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(objects)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        keys::validate_key(key)?;
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(_) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        keys::validate_key(key)?;
        let location = Path::from(key);
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(all(test, feature = "storage-s3"))]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn storage() -> (Arc<InMemory>, S3Storage) {
        let memory = Arc::new(InMemory::new());
        let storage = S3Storage::with_store(
            memory.clone(),
            "gallery",
            "https://cdn.example.com/",
        );
        (memory, storage)
    }

    #[test]
    fn test_default_headers_public_read_acl() {
        let headers = default_headers(true).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-amz-acl").unwrap(), "public-read");

        assert!(default_headers(false).is_none());
    }

    #[test]
    fn test_public_base_url_variants() {
        let mut settings = S3Settings {
            bucket: "gallery".to_string(),
            region: "eu-west-1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            public_base_url(&settings),
            "https://gallery.s3.eu-west-1.amazonaws.com"
        );

        settings.endpoint_url = Some("http://localhost:9000/".to_string());
        assert_eq!(public_base_url(&settings), "http://localhost:9000/gallery");

        settings.public_base_url = Some("https://img.example.com/".to_string());
        assert_eq!(public_base_url(&settings), "https://img.example.com");
    }

    #[tokio::test]
    async fn test_put_stores_under_images_prefix_with_content_type() {
        let (memory, storage) = storage();

        let key = storage.original_key("a.png");
        let url = storage.put(&key, b"png".to_vec(), "image/png").await.unwrap();

        assert_eq!(url, "https://cdn.example.com/images/a.png");

        let stored = memory.get(&Path::from("images/a.png")).await.unwrap();
        assert_eq!(
            stored
                .attributes
                .get(&Attribute::ContentType)
                .map(|v| v.as_ref()),
            Some("image/png")
        );
        assert_eq!(stored.bytes().await.unwrap().as_ref(), b"png");
    }

    #[tokio::test]
    async fn test_thumbnail_colocated_with_original() {
        let (_, storage) = storage();

        assert_eq!(storage.thumbnail_key("a.png"), "images/a_thumb.png");
        let url = storage
            .put(&storage.thumbnail_key("a.png"), vec![1], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example.com/images/a_thumb.png");
    }

    #[tokio::test]
    async fn test_list_returns_direct_children_of_prefix() {
        let (memory, storage) = storage();

        storage.put("images/a.png", vec![1, 2], "image/png").await.unwrap();
        storage.put("images/a_thumb.png", vec![1], "image/png").await.unwrap();
        memory
            .put(&Path::from("other/b.png"), PutPayload::from(vec![1u8]))
            .await
            .unwrap();

        let mut listed = storage.list(storage.asset_prefix()).await.unwrap();
        listed.sort_by(|a, b| a.key.cmp(&b.key));

        let keys: Vec<&str> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["images/a.png", "images/a_thumb.png"]);
        assert_eq!(listed[0].size_bytes, 2);
        assert_eq!(listed[0].file_name(), "a.png");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, storage) = storage();

        storage.put("images/a.gif", vec![1], "image/gif").await.unwrap();
        assert!(storage.exists("images/a.gif").await.unwrap());

        storage.delete("images/a.gif").await.unwrap();
        assert!(!storage.exists("images/a.gif").await.unwrap());
        assert!(storage.delete("images/a.gif").await.is_ok());
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_, storage) = storage();

        let result = storage.put("images/../secret", vec![1], "image/png").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
