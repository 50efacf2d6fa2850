//! Service configuration loading and types.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grid_processor::{BatchConfig, ExtractConfig};
use grid_reader::VariableNames;
use renderer::ChartConfig;
use sat_common::{TargetPoint, Tolerance};
use serde::{Deserialize, Serialize};

/// Overrides `data_dir` after the file is loaded.
pub const DATA_DIR_ENV: &str = "TIMESERIES_DATA_DIR";

/// Overrides `static_dir` after the file is loaded.
pub const STATIC_DIR_ENV: &str = "TIMESERIES_STATIC_DIR";

/// File name of the most recent chart inside `static_dir`.
pub const CHART_FILE_NAME: &str = "chart.png";

/// Service configuration loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding one grid file per day.
    pub data_dir: PathBuf,

    /// Directory served under `/static`; the latest chart is written here.
    pub static_dir: PathBuf,

    /// Grid file extensions to pick up.
    pub extensions: Vec<String>,

    /// Half-widths of the query box in degrees.
    pub tolerance: Tolerance,

    /// Variable names inside each grid file.
    pub variables: VariableNames,

    /// Target used when a GET request omits `lat` or `lon` (Sogamoso).
    pub default_target: TargetPoint,

    pub chart: ChartConfig,

    /// Process files on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let batch = BatchConfig::default();
        Self {
            data_dir: batch.data_dir,
            static_dir: PathBuf::from("static"),
            extensions: batch.extensions,
            tolerance: batch.extract.tolerance,
            variables: batch.extract.variables,
            default_target: TargetPoint::new(5.7141, -72.9339),
            chart: ChartConfig::default(),
            parallel: batch.parallel,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {:?}", path))?;
            let config = Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse service config: {:?}", path))?;
            tracing::info!(path = %path.display(), "Loaded service config");
            config
        } else {
            tracing::warn!(
                "Config file {} does not exist, using defaults",
                path.display()
            );
            Self::default()
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply directory overrides looked up through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(STATIC_DIR_ENV).filter(|v| !v.is_empty()) {
            self.static_dir = PathBuf::from(dir);
        }
        self
    }

    /// Batch settings derived from this configuration.
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            data_dir: self.data_dir.clone(),
            extensions: self.extensions.clone(),
            extract: ExtractConfig {
                tolerance: self.tolerance,
                variables: self.variables.clone(),
            },
            parallel: self.parallel,
        }
    }

    /// Where the latest chart is saved.
    pub fn chart_path(&self) -> PathBuf {
        self.static_dir.join(CHART_FILE_NAME)
    }
}
