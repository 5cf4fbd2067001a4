use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use galleria_core::AssetResponse;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::extract_multipart_file;

/// Upload image handler
///
/// Accepts a multipart form with one file field (`image` or `file`). The
/// part's content type is only a hint; the pipeline sniffs the bytes.
///
/// # Returns
/// `AssetResponse` for the stored original and its thumbnail (HTTP 201 Created)
///
/// # Errors
/// - `AppError::PayloadTooLarge` - File exceeds the configured limit
/// - `AppError::UnsupportedMediaType` - Content is not an accepted image
/// - `AppError::ThumbnailGenerationFailed` - Image could not be decoded or re-encoded
/// - `AppError::BackendWriteFailed` - Storage write failure
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart?;
    let max_size = state.config.max_file_size_bytes();

    let file = extract_multipart_file(multipart, max_size).await?;
    tracing::debug!(
        file_name = ?file.file_name,
        declared = %file.content_type,
        size_bytes = file.data.len(),
        "Received upload"
    );

    let asset = state
        .pipeline
        .upload(file.data, &file.content_type)
        .await?;

    Ok((StatusCode::CREATED, Json(AssetResponse::from(asset))))
}
