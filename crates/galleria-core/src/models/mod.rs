pub mod asset;
pub mod media_kind;

pub use asset::{Asset, AssetListing, AssetResponse, DeleteResponse};
pub use media_kind::MediaKind;
