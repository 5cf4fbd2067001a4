//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use galleria_core::Config;
use galleria_processing::AssetPipeline;
use std::sync::Arc;

/// Initialize the entire application: validate config, install tracing,
/// then build state and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    build_app(config).await
}

/// Build state and router without touching global tracing. Integration
/// tests call this directly.
pub async fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::error::set_production_mode(config.is_production());

    let storage = storage::setup_storage(&config).await?;
    let pipeline = AssetPipeline::new(storage, config.pipeline().clone());
    let state = Arc::new(AppState::new(pipeline, config.clone()));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
