//! Galleria Storage Library
//!
//! This crate provides the storage abstraction and its two implementations:
//! the local filesystem and an S3-compatible object store.
//!
//! # Storage key layout
//!
//! Both backends store an original and its thumbnail under names produced by
//! `galleria_core::naming`, but place them differently:
//!
//! - **Local**: originals directly in the root directory (`{file}`), thumbnails
//!   in a nested directory (`thumbnails/{file}_thumb.{ext}`).
//! - **Object store**: everything under one prefix, co-located
//!   (`images/{file}`, `images/{file}_thumb.{ext}`).
//!
//! Keys must not contain `..` or a leading `/`. The layout lives in the `keys`
//! module so both backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use galleria_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
