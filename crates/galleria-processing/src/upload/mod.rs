//! Asset pipeline: validate → name → thumbnail → store, plus list and delete.

pub mod pipeline;

pub use pipeline::AssetPipeline;
