//! Shared application state.

use galleria_core::Config;
use galleria_processing::AssetPipeline;

/// Handlers extract `State<Arc<AppState>>`. Nothing in here is mutated after
/// startup; the storage backend is the only shared mutable resource.
pub struct AppState {
    pub pipeline: AssetPipeline,
    pub config: Config,
}

impl AppState {
    pub fn new(pipeline: AssetPipeline, config: Config) -> Self {
        Self { pipeline, config }
    }
}
