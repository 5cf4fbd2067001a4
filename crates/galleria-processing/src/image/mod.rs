//! Image processing module
//!
//! Thumbnail derivation: decode, bounded resize, re-encode in the input format.

pub mod thumbnail;

pub use thumbnail::{generate_thumbnail, thumbnail_dimensions, ThumbnailError};
