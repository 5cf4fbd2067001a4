//! Asset models
//!
//! An asset is the pair of blobs produced by one successful upload: the
//! original image and its derived thumbnail. Nothing here is persisted on its
//! own; listings are rebuilt from backend enumeration on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MediaKind;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Stored file name of the original, e.g. `1718000000000-9f2c4e1ab37d0c55.png`.
    pub id: String,
    pub extension: String,
    pub original_key: String,
    pub thumbnail_key: String,
    pub url: String,
    pub thumbnail_url: String,
    pub media_type: MediaKind,
    /// Size of the original blob.
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Public upload response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    pub url: String,
    pub thumbnail_url: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            url: asset.url,
            thumbnail_url: asset.thumbnail_url,
            media_type: asset.media_type.mime().to_string(),
            size_bytes: asset.size_bytes,
            created_at: asset.created_at,
        }
    }
}

/// One entry of the gallery listing.
///
/// `thumbnail_url` is `None` only when thumbnail verification is enabled and
/// the thumbnail object is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetListing {
    pub file: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub size_bytes: u64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub ok: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
