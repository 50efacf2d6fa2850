//! Grid file readers for gridded satellite products.
//!
//! This crate opens HDF4, HDF5 and netCDF grid files and hands out their
//! variables as dense [`GridArray`]s. Callers work against the
//! [`GridFileReader`] trait and never against a concrete container format.
//!
//! # Reading conventions
//!
//! - [`GridFileReader::read_variable`] returns physical values: cells equal
//!   to `_FillValue`/`missing_value` become NaN and `scale_factor`/`add_offset`
//!   are applied when present.
//! - [`GridFileReader::read_flags`] returns raw integer codes, untouched.

pub mod array;
pub mod error;
pub mod format;
pub mod memory;
pub mod native;
pub mod schema;

use std::path::Path;

pub use array::{meshgrid, GridArray};
pub use error::{GridReadError, GridReadResult};
pub use format::GridFormat;
pub use memory::InMemoryGrid;
pub use native::{silence_hdf5_errors, NetCdfReader};
pub use schema::VariableNames;

/// Read access to the named variables of one grid file.
pub trait GridFileReader {
    /// Container format of the underlying file.
    fn format(&self) -> GridFormat;

    /// Human-readable origin (usually the file path) for logs and errors.
    fn source(&self) -> &str;

    /// Read a variable as physical `f32` values.
    fn read_variable(&self, name: &str) -> GridReadResult<GridArray<f32>>;

    /// Read an integer flag variable without scaling or fill masking.
    fn read_flags(&self, name: &str) -> GridReadResult<GridArray<i32>>;
}

/// Open a grid file, choosing the reader from the file signature.
pub fn open_grid_file<P: AsRef<Path>>(path: P) -> GridReadResult<Box<dyn GridFileReader>> {
    let path = path.as_ref();
    let format = GridFormat::detect(path)?;
    Ok(Box::new(NetCdfReader::open_as(path, format)?))
}
