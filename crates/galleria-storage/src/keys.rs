//! Shared key layout for storage backends.
//!
//! Local: `{file}` and `thumbnails/{file}_thumb.{ext}`.
//! Object store: `images/{file}` and `images/{file}_thumb.{ext}`.

use galleria_core::naming;

use crate::traits::{StorageError, StorageResult};

/// Directory (relative to the local root) holding thumbnails.
pub const LOCAL_THUMBNAIL_DIR: &str = "thumbnails";

/// Prefix shared by originals and thumbnails in the object store.
pub const OBJECT_PREFIX: &str = "images";

pub fn local_original_key(file_name: &str) -> String {
    file_name.to_string()
}

pub fn local_thumbnail_key(file_name: &str) -> String {
    format!("{}/{}", LOCAL_THUMBNAIL_DIR, naming::thumbnail_name(file_name))
}

pub fn object_original_key(file_name: &str) -> String {
    format!("{}/{}", OBJECT_PREFIX, file_name)
}

pub fn object_thumbnail_key(file_name: &str) -> String {
    format!("{}/{}", OBJECT_PREFIX, naming::thumbnail_name(file_name))
}

/// Reject keys that could escape the storage root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}

/// Join a listing prefix and a file name into a key.
pub fn join(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", prefix, file_name)
    }
}
