//! Granule fixtures written as real netCDF-4 files.
//!
//! The files carry the AIRS Level-3 variable names, so the default reader
//! configuration finds everything it needs.

use std::path::{Path, PathBuf};

use crate::generators::create_uniform_grid;

pub const LATITUDE: &str = "GridCenterLatitude";
pub const LONGITUDE: &str = "GridCenterLongitude";
pub const PRECIPITATION: &str = "IR_Precip_Est";
pub const PRECIPITATION_QC: &str = "IR_Precip_Est_QC";
pub const CLOUD_FRACTION: &str = "CldFrcStd";
pub const CLOUD_TOP_PRESSURE: &str = "PCldTopStd";

/// Fill value written into fixture data variables.
pub const FILL_VALUE: f32 = -9999.0;

/// Contents of one synthetic daily granule.
///
/// Data arrays are row-major `[lats.len(), lons.len()]`.
#[derive(Debug, Clone)]
pub struct GranuleSpec {
    pub lats: Vec<f32>,
    pub lons: Vec<f32>,
    /// Write latitude/longitude as 2-D grids instead of 1-D axes.
    pub two_d_coordinates: bool,
    pub precipitation: Vec<f32>,
    pub quality: Vec<f32>,
    pub cloud_fraction: Vec<f32>,
    pub cloud_top_pressure: Vec<f32>,
    /// Variables left out of the file, to simulate broken granules.
    pub omit: Vec<&'static str>,
}

impl GranuleSpec {
    /// Every cell holds the same values; quality codes are all 0.
    pub fn uniform(lats: Vec<f32>, lons: Vec<f32>, precip: f32, cloud: f32, pressure: f32) -> Self {
        let (w, h) = (lons.len(), lats.len());
        Self {
            precipitation: create_uniform_grid(w, h, precip),
            quality: create_uniform_grid(w, h, 0.0),
            cloud_fraction: create_uniform_grid(w, h, cloud),
            cloud_top_pressure: create_uniform_grid(w, h, pressure),
            lats,
            lons,
            two_d_coordinates: false,
            omit: Vec::new(),
        }
    }

    pub fn with_2d_coordinates(mut self) -> Self {
        self.two_d_coordinates = true;
        self
    }

    pub fn without(mut self, variable: &'static str) -> Self {
        self.omit.push(variable);
        self
    }
}

/// File name following the AIRS convention for `date` (`YYYY.MM.DD`).
pub fn granule_name(date: &str) -> String {
    format!("AIRS.{}.L3.RetStd_IR001.v7.0.3.0.hdf", date)
}

/// Write `spec` to `dir` under the AIRS name for `date`.
pub fn write_granule_in(dir: &Path, date: &str, spec: &GranuleSpec) -> PathBuf {
    let path = dir.join(granule_name(date));
    write_granule(&path, spec).expect("Failed to write granule fixture");
    path
}

/// Write `spec` as a netCDF-4 file at `path`.
pub fn write_granule(path: &Path, spec: &GranuleSpec) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_attribute("title", "synthetic daily granule")?;

    file.add_dimension("lat", spec.lats.len())?;
    file.add_dimension("lon", spec.lons.len())?;
    let grid_dims = ["lat", "lon"];

    if spec.two_d_coordinates {
        let mut lat_grid = Vec::with_capacity(spec.lats.len() * spec.lons.len());
        let mut lon_grid = Vec::with_capacity(spec.lats.len() * spec.lons.len());
        for &lat in &spec.lats {
            for &lon in &spec.lons {
                lat_grid.push(lat);
                lon_grid.push(lon);
            }
        }
        put_f32(&mut file, spec, LATITUDE, &grid_dims, &lat_grid, None)?;
        put_f32(&mut file, spec, LONGITUDE, &grid_dims, &lon_grid, None)?;
    } else {
        put_f32(&mut file, spec, LATITUDE, &["lat"], &spec.lats, None)?;
        put_f32(&mut file, spec, LONGITUDE, &["lon"], &spec.lons, None)?;
    }

    put_f32(&mut file, spec, PRECIPITATION, &grid_dims, &spec.precipitation, Some(FILL_VALUE))?;
    put_f32(&mut file, spec, PRECIPITATION_QC, &grid_dims, &spec.quality, None)?;
    put_f32(&mut file, spec, CLOUD_FRACTION, &grid_dims, &spec.cloud_fraction, Some(FILL_VALUE))?;
    put_f32(
        &mut file,
        spec,
        CLOUD_TOP_PRESSURE,
        &grid_dims,
        &spec.cloud_top_pressure,
        Some(FILL_VALUE),
    )?;

    Ok(())
}

fn put_f32(
    file: &mut netcdf::FileMut,
    spec: &GranuleSpec,
    name: &str,
    dims: &[&str],
    values: &[f32],
    fill_value: Option<f32>,
) -> Result<(), netcdf::Error> {
    if spec.omit.iter().any(|omitted| *omitted == name) {
        return Ok(());
    }
    let mut var = file.add_variable::<f32>(name, dims)?;
    if let Some(fill) = fill_value {
        var.put_attribute("_FillValue", fill)?;
    }
    var.put_values(values, ..)?;
    Ok(())
}
