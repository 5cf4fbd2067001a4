//! Galleria Core Library
//!
//! This crate provides the domain model, error types, configuration and the
//! asset naming convention shared by every Galleria component.

pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PipelineConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Asset, AssetListing, AssetResponse, DeleteResponse, MediaKind};
pub use storage_types::StorageBackend;
