//! Application state for the time-series API.

use anyhow::{Context, Result};
use grid_processor::BatchAggregator;

use crate::config::ServiceConfig;

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,

    /// Aggregator over the configured data directory.
    pub aggregator: BatchAggregator,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        let aggregator = BatchAggregator::new(config.batch_config());
        Self { config, aggregator }
    }

    /// Build state and create the static directory if it is missing.
    pub fn bootstrap(config: ServiceConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.static_dir)
            .with_context(|| format!("Failed to create static dir: {:?}", config.static_dir))?;

        if !config.data_dir.is_dir() {
            tracing::warn!(
                dir = %config.data_dir.display(),
                "Data directory does not exist yet; requests will fail until it does"
            );
        }

        Ok(Self::new(config))
    }
}
