//! Error types for grid file reading.

use thiserror::Error;

/// Result type for grid reader operations.
pub type GridReadResult<T> = Result<T, GridReadError>;

/// Error types for grid file reading.
#[derive(Error, Debug)]
pub enum GridReadError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File is not a recognised grid container
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// File could not be opened or decoded by the netCDF library
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Array sizes do not agree
    #[error("Shape mismatch for '{variable}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        variable: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

impl GridReadError {
    pub fn shape_mismatch(
        variable: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::ShapeMismatch {
            variable: variable.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
