//! Native grid file reading using the netcdf library.
//!
//! libnetcdf reads netCDF classic files, netCDF-4/HDF5 files and, when it is
//! built with `--enable-hdf4`, HDF4 granules such as the AIRS Level-3
//! products. One reader therefore serves all three container formats; the
//! detected [`GridFormat`] is kept for logging and error reporting.

use std::path::Path;
use std::sync::Once;

use tracing::debug;

use crate::array::GridArray;
use crate::error::{GridReadError, GridReadResult};
use crate::format::GridFormat;
use crate::GridFileReader;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This function disables that output by calling
/// H5Eset_auto2 with null handlers. It only needs to be called once per process,
/// but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// A grid file opened read-only through libnetcdf.
///
/// The underlying file handle is closed when the reader is dropped.
pub struct NetCdfReader {
    file: netcdf::File,
    format: GridFormat,
    source: String,
}

impl NetCdfReader {
    /// Open `path`, detecting its container format first.
    pub fn open<P: AsRef<Path>>(path: P) -> GridReadResult<Self> {
        let path = path.as_ref();
        let format = GridFormat::detect(path)?;
        Self::open_as(path, format)
    }

    /// Open `path` as a file already known to be `format`.
    pub fn open_as<P: AsRef<Path>>(path: P, format: GridFormat) -> GridReadResult<Self> {
        let path = path.as_ref();
        silence_hdf5_errors();

        let file = netcdf::open(path).map_err(|e| {
            let hint = if format == GridFormat::Hdf4 {
                " (libnetcdf must be built with HDF4 support)"
            } else {
                ""
            };
            GridReadError::InvalidFormat(format!(
                "Failed to open {} file {}: {}{}",
                format,
                path.display(),
                e,
                hint
            ))
        })?;

        debug!(file = %path.display(), format = %format, "Opened grid file");

        Ok(Self {
            file,
            format,
            source: path.display().to_string(),
        })
    }

    fn variable(&self, name: &str) -> GridReadResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| GridReadError::MissingData(format!("{} variable in {}", name, self.source)))
    }

    fn read_raw(&self, var: &netcdf::Variable<'_>, name: &str) -> GridReadResult<GridArray<f32>> {
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let data: Vec<f32> = var.get_values(..).map_err(|e| {
            GridReadError::InvalidFormat(format!("Failed to read {}: {}", name, e))
        })?;
        GridArray::new(name, data, shape)
    }
}

impl GridFileReader for NetCdfReader {
    fn format(&self) -> GridFormat {
        self.format
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn read_variable(&self, name: &str) -> GridReadResult<GridArray<f32>> {
        let var = self.variable(name)?;
        let mut array = self.read_raw(&var, name)?;

        let fill_value =
            get_f64_attr(&var, "_FillValue").or_else(|| get_f64_attr(&var, "missing_value"));
        let scale_factor = get_f64_attr(&var, "scale_factor").unwrap_or(1.0);
        let add_offset = get_f64_attr(&var, "add_offset").unwrap_or(0.0);
        let scaled = scale_factor != 1.0 || add_offset != 0.0;

        for value in array.data.iter_mut() {
            if fill_value.is_some_and(|fill| *value as f64 == fill) {
                *value = f32::NAN;
            } else if scaled {
                *value = (*value as f64 * scale_factor + add_offset) as f32;
            }
        }

        Ok(array)
    }

    fn read_flags(&self, name: &str) -> GridReadResult<GridArray<i32>> {
        let var = self.variable(name)?;
        let raw = self.read_raw(&var, name)?;
        Ok(GridArray {
            data: raw.data.iter().map(|&v| v as i32).collect(),
            shape: raw.shape,
        })
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a numeric attribute as f64.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}
