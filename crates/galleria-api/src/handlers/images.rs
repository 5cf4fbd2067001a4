use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use galleria_core::{AssetListing, DeleteResponse};
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    key: Option<String>,
}

/// List stored images, most recent first.
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AssetListing>>, HttpAppError> {
    let listings = state.pipeline.list().await?;
    Ok(Json(listings))
}

/// Delete an image and its thumbnail.
///
/// When an admin key is configured the `key` query parameter must match it.
/// Deleting an image that no longer exists succeeds.
#[tracing::instrument(skip_all, fields(operation = "delete_image", file = %file))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let response = state
        .pipeline
        .delete(&file, query.key.as_deref())
        .await?;
    Ok(Json(response))
}
