//! Error types for grid extraction and batch aggregation.

use std::path::PathBuf;

use grid_reader::GridReadError;
use sat_common::PointError;
use thiserror::Error;

use crate::batch::BatchReport;

/// Errors from a single extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file could not be opened, or lacks the variables or shapes required.
    #[error("file unreadable: {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: GridReadError,
    },

    /// The target point is not a valid geographic coordinate.
    #[error("invalid target: {0}")]
    InvalidTarget(#[from] PointError),

    /// Bounding box half-widths must be finite and positive.
    #[error("invalid tolerance: lat={lat}, lon={lon} (must be finite and > 0)")]
    InvalidTolerance { lat: f64, lon: f64 },
}

impl ExtractError {
    /// Create a FileUnreadable error.
    pub fn unreadable(path: impl Into<String>, source: GridReadError) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            source,
        }
    }

    /// Whether this error concerns one file rather than the request.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileUnreadable { .. })
    }
}

/// Errors that stop a whole batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The data directory is missing or cannot be listed.
    #[error("cannot read source directory {path}: {source}")]
    SourceDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request itself is invalid; no file could succeed.
    #[error(transparent)]
    InvalidRequest(ExtractError),

    /// Every file was skipped or none were found.
    #[error("no usable files: {} discovered, {} skipped", .0.discovered, .0.skipped.len())]
    EmptyDataset(BatchReport),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type for batch operations.
pub type BatchResult<T> = std::result::Result<T, BatchError>;
