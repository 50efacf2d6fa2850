//! Configuration for extraction and batch aggregation.

use std::path::PathBuf;

use grid_reader::VariableNames;
use sat_common::Tolerance;
use serde::{Deserialize, Serialize};

/// Parameters of a single-file extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Half-widths of the query box in degrees.
    pub tolerance: Tolerance,

    /// Variable names inside each grid file.
    pub variables: VariableNames,
}

/// Configuration for the batch aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory holding one grid file per day.
    pub data_dir: PathBuf,

    /// File extensions to pick up, compared case-insensitively.
    pub extensions: Vec<String>,

    /// Per-file extraction parameters.
    pub extract: ExtractConfig,

    /// Process files on the rayon thread pool.
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("files"),
            extensions: vec!["hdf".to_string()],
            extract: ExtractConfig::default(),
            parallel: true,
        }
    }
}

impl BatchConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Whether `extension` is one of the configured grid file extensions.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}
