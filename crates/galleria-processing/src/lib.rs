//! Galleria Processing Library
//!
//! Content validation, thumbnail derivation and the asset pipeline that ties
//! them to a storage backend.

pub mod image;
pub mod upload;
pub mod validator;

pub use self::image::thumbnail::{generate_thumbnail, MAX_THUMBNAIL_DIMENSION};
pub use upload::AssetPipeline;
pub use validator::{MediaValidator, ValidationError};
