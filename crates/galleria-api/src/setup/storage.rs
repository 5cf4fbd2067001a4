//! Storage setup and initialization

use anyhow::{Context, Result};
use galleria_core::Config;
use galleria_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the single storage backend selected by configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        prefix = %storage.asset_prefix(),
        "Storage backend initialized successfully"
    );

    Ok(storage)
}
