//! Regional means of precipitation, cloud fraction and cloud-top pressure.
//!
//! One call reads one grid file, restricts each field to the cells inside a
//! bounding box around the target point and reduces it to a NaN-aware mean.
//!
//! ```text
//! lat/lon ──► (1-D? meshgrid) ──► region mask ─────────────┐
//! IR_Precip_Est ──► keep where QC == 0 ──────────► select ──► nan_mean        ──► precipitation
//! CldFrcStd ───────────────────────────────────► select ──► nan_mean / 100  ──► cloud_fraction
//! PCldTopStd ──► NaN outside [100, 1000] hPa ──► select ──► nan_mean        ──► cloud_top_pressure
//! ```

use std::path::Path;

use grid_reader::{meshgrid, open_grid_file, GridArray, GridFileReader, GridReadError};
use sat_common::{BoundingBox, TargetPoint, Tolerance};
use serde::Serialize;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::stats::nan_mean;

/// Lowest plausible cloud-top pressure in hPa.
pub const MIN_CLOUD_TOP_PRESSURE: f32 = 100.0;

/// Highest plausible cloud-top pressure in hPa.
pub const MAX_CLOUD_TOP_PRESSURE: f32 = 1000.0;

/// Quality code of the most confident precipitation retrievals.
pub const BEST_QUALITY: i32 = 0;

/// Cloud fraction is stored in percent.
pub const CLOUD_FRACTION_SCALE: f64 = 100.0;

/// Regional means for one grid file. Each field is finite or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// Mean precipitation estimate (mm/day) over best-quality cells.
    pub precipitation: f64,
    /// Mean cloud fraction in [0, 1].
    pub cloud_fraction: f64,
    /// Mean cloud-top pressure (hPa) over plausible cells.
    pub cloud_top_pressure: f64,
}

impl ExtractionResult {
    /// True when all three values are NaN.
    pub fn is_empty(&self) -> bool {
        self.precipitation.is_nan() && self.cloud_fraction.is_nan() && self.cloud_top_pressure.is_nan()
    }
}

/// Check the request parameters shared by every file of a query.
pub fn validate_request(target: TargetPoint, tolerance: Tolerance) -> ExtractResult<()> {
    target.validate()?;
    if !tolerance.is_valid() {
        return Err(ExtractError::InvalidTolerance {
            lat: tolerance.lat,
            lon: tolerance.lon,
        });
    }
    Ok(())
}

/// Open `path`, extract the regional means and close the file.
///
/// The reader is dropped before this function returns on every path.
pub fn extract_file<P: AsRef<Path>>(
    path: P,
    target: TargetPoint,
    config: &ExtractConfig,
) -> ExtractResult<ExtractionResult> {
    let path = path.as_ref();
    validate_request(target, config.tolerance)?;

    let reader = open_grid_file(path)
        .map_err(|e| ExtractError::unreadable(path.display().to_string(), e))?;
    extract(reader.as_ref(), target, config)
}

/// Extract the regional means from an open grid file.
///
/// Arrays handed out by `reader` are never modified; every filter builds a
/// new vector.
pub fn extract(
    reader: &dyn GridFileReader,
    target: TargetPoint,
    config: &ExtractConfig,
) -> ExtractResult<ExtractionResult> {
    validate_request(target, config.tolerance)?;

    let names = &config.variables;
    let unreadable = |e: GridReadError| ExtractError::unreadable(reader.source(), e);

    let latitudes = reader.read_variable(&names.latitude).map_err(unreadable)?;
    let longitudes = reader.read_variable(&names.longitude).map_err(unreadable)?;
    let precipitation = reader.read_variable(&names.precipitation).map_err(unreadable)?;
    let cloud_fraction = reader.read_variable(&names.cloud_fraction).map_err(unreadable)?;
    let cloud_pressure = reader
        .read_variable(&names.cloud_top_pressure)
        .map_err(unreadable)?;
    let quality = reader
        .read_flags(&names.precipitation_quality)
        .map_err(unreadable)?;

    let (lat_grid, lon_grid) =
        coordinate_grid(latitudes, longitudes, &names.latitude, &names.longitude)
            .map_err(unreadable)?;
    let grid_shape = lat_grid.spatial_shape().to_vec();

    check_shape(&names.precipitation, &grid_shape, &precipitation).map_err(unreadable)?;
    check_shape(&names.cloud_fraction, &grid_shape, &cloud_fraction).map_err(unreadable)?;
    check_shape(&names.cloud_top_pressure, &grid_shape, &cloud_pressure).map_err(unreadable)?;
    check_shape(&names.precipitation_quality, &grid_shape, &quality).map_err(unreadable)?;

    let plausible_pressure = mask_implausible_pressure(&cloud_pressure.data);
    let best_precipitation = mask_by_quality(&precipitation.data, &quality.data);

    let bbox = BoundingBox::around(target, config.tolerance);
    let region = region_mask(&lat_grid.data, &lon_grid.data, &bbox);

    let precip_region = select(&best_precipitation, &region);
    let cloud_region = select(&cloud_fraction.data, &region);
    let pressure_region = select(&plausible_pressure, &region);

    debug!(
        source = reader.source(),
        format = %reader.format(),
        target = %target,
        cells = precip_region.len(),
        "Extracted region"
    );

    Ok(ExtractionResult {
        precipitation: nan_mean(&precip_region),
        cloud_fraction: nan_mean(&cloud_region) / CLOUD_FRACTION_SCALE,
        cloud_top_pressure: nan_mean(&pressure_region),
    })
}

/// Resolve the 2-D coordinate grid.
///
/// Two 1-D axes are expanded with [`meshgrid`]; anything else must already
/// be a pair of equally shaped grids.
fn coordinate_grid(
    latitudes: GridArray<f32>,
    longitudes: GridArray<f32>,
    lat_name: &str,
    lon_name: &str,
) -> Result<(GridArray<f32>, GridArray<f32>), GridReadError> {
    if let (Some(lats), Some(lons)) = (latitudes.as_1d(), longitudes.as_1d()) {
        return Ok(meshgrid(lats, lons));
    }

    if latitudes.spatial_shape() != longitudes.spatial_shape() {
        return Err(GridReadError::shape_mismatch(
            lon_name,
            latitudes.spatial_shape(),
            longitudes.spatial_shape(),
        ));
    }
    debug!(variable = lat_name, shape = ?latitudes.shape, "Using 2-D coordinate grid");

    Ok((latitudes, longitudes))
}

fn check_shape<T>(name: &str, grid_shape: &[usize], array: &GridArray<T>) -> Result<(), GridReadError> {
    if array.spatial_shape() != grid_shape {
        return Err(GridReadError::shape_mismatch(name, grid_shape, array.spatial_shape()));
    }
    Ok(())
}

/// Replace cloud-top pressures outside [100, 1000] hPa with NaN.
pub fn mask_implausible_pressure(values: &[f32]) -> Vec<f32> {
    values
        .iter()
        .map(|&p| {
            if p < MIN_CLOUD_TOP_PRESSURE || p > MAX_CLOUD_TOP_PRESSURE {
                f32::NAN
            } else {
                p
            }
        })
        .collect()
}

/// Keep precipitation only where the quality code is [`BEST_QUALITY`].
pub fn mask_by_quality(values: &[f32], codes: &[i32]) -> Vec<f32> {
    values
        .iter()
        .zip(codes)
        .map(|(&v, &qc)| if qc == BEST_QUALITY { v } else { f32::NAN })
        .collect()
}

/// Cells whose coordinates fall inside `bbox` (edges inclusive, compared
/// in the grid's f32 precision).
pub fn region_mask(lats: &[f32], lons: &[f32], bbox: &BoundingBox) -> Vec<bool> {
    lats.iter()
        .zip(lons)
        .map(|(&lat, &lon)| bbox.contains_cell(lat, lon))
        .collect()
}

/// Values at the positions where `mask` is set, in grid order.
pub fn select(values: &[f32], mask: &[bool]) -> Vec<f32> {
    values
        .iter()
        .zip(mask)
        .filter_map(|(&v, &keep)| keep.then_some(v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_reader::InMemoryGrid;
    use grid_reader::VariableNames;

    fn grid(
        lats: Vec<f32>,
        lons: Vec<f32>,
        shape: Vec<usize>,
        precip: Vec<f32>,
        qc: Vec<i32>,
        cloud: Vec<f32>,
        pressure: Vec<f32>,
    ) -> InMemoryGrid {
        let names = VariableNames::default();
        let n = shape.clone();
        InMemoryGrid::new("test")
            .with_variable(names.latitude, GridArray::from_vec(lats))
            .with_variable(names.longitude, GridArray::from_vec(lons))
            .with_variable(names.precipitation, GridArray::new("p", precip, n.clone()).unwrap())
            .with_variable(names.cloud_fraction, GridArray::new("c", cloud, n.clone()).unwrap())
            .with_variable(
                names.cloud_top_pressure,
                GridArray::new("t", pressure, n.clone()).unwrap(),
            )
            .with_flags(names.precipitation_quality, GridArray::new("q", qc, n).unwrap())
    }

    #[test]
    fn test_mask_implausible_pressure_bounds_are_inclusive() {
        let out = mask_implausible_pressure(&[50.0, 100.0, 1000.0, 1500.0, 900.0]);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 100.0);
        assert_eq!(out[2], 1000.0);
        assert!(out[3].is_nan());
        assert_eq!(out[4], 900.0);
    }

    #[test]
    fn test_mask_by_quality() {
        let out = mask_by_quality(&[1.0, 2.0, 3.0], &[0, 1, 0]);
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 3.0);
    }

    #[test]
    fn test_region_mask_keeps_f32_edge_cells() {
        let bbox = BoundingBox::around(TargetPoint::new(0.0, 0.0), Tolerance::new(0.3, 0.3));
        let lats = [-0.3f32, 0.0, 0.3, 0.31];
        let lons = [0.0f32, -0.3, 0.3, 0.0];
        assert_eq!(region_mask(&lats, &lons, &bbox), vec![true, true, true, false]);
    }

    #[test]
    fn test_extract_includes_cells_on_box_edges() {
        // Rows at -0.3, 0.0, 0.3 with tolerance 0.3: every row sits on or inside the box
        let reader = grid(
            vec![-0.3, 0.0, 0.3],
            vec![0.0],
            vec![3, 1],
            vec![1.0, 2.0, 6.0],
            vec![0, 0, 0],
            vec![10.0, 20.0, 30.0],
            vec![400.0, 500.0, 600.0],
        );
        let config = ExtractConfig {
            tolerance: Tolerance::new(0.3, 0.3),
            ..Default::default()
        };

        let result = extract(&reader, TargetPoint::new(0.0, 0.0), &config).unwrap();
        assert_eq!(result.precipitation, 3.0);
        assert_eq!(result.cloud_fraction, 0.2);
        assert_eq!(result.cloud_top_pressure, 500.0);
    }

    #[test]
    fn test_extract_drops_leading_singleton_dimension() {
        // Data stored as [1, 2, 2] against 1-D axes of length 2
        let reader = grid(
            vec![10.0, 20.0],
            vec![100.0, 110.0],
            vec![1, 2, 2],
            vec![1.0, 2.0, 3.0, 4.0],
            vec![0, 0, 1, 0],
            vec![20.0, 40.0, 60.0, 80.0],
            vec![300.0, 400.0, 500.0, 2000.0],
        );
        let config = ExtractConfig {
            tolerance: Tolerance::new(10.0, 10.0),
            ..Default::default()
        };

        let result = extract(&reader, TargetPoint::new(15.0, 105.0), &config).unwrap();
        assert_eq!(result.precipitation, 7.0 / 3.0);
        assert_eq!(result.cloud_fraction, 0.5);
        assert_eq!(result.cloud_top_pressure, 400.0);

        // Only the (20, 100) cell
        let narrow = ExtractConfig {
            tolerance: Tolerance::new(1.0, 1.0),
            ..Default::default()
        };
        let result = extract(&reader, TargetPoint::new(20.0, 100.0), &narrow).unwrap();
        assert!(result.precipitation.is_nan());
        assert_eq!(result.cloud_fraction, 0.6);
        assert_eq!(result.cloud_top_pressure, 500.0);
    }

    #[test]
    fn test_select_keeps_grid_order() {
        assert_eq!(select(&[1.0, 2.0, 3.0, 4.0], &[true, false, true, true]), vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_extract_small_grid() {
        // 1 x 3 grid along longitude; all cells within the box
        let reader = grid(
            vec![10.0],
            vec![99.8, 100.0, 100.2],
            vec![1, 3],
            vec![1.0, 2.0, 3.0],
            vec![0, 1, 0],
            vec![50.0, 50.0, 50.0],
            vec![50.0, 1500.0, 900.0],
        );

        let result = extract(&reader, TargetPoint::new(10.0, 100.0), &ExtractConfig::default()).unwrap();
        assert_eq!(result.precipitation, 2.0);
        assert_eq!(result.cloud_fraction, 0.5);
        assert_eq!(result.cloud_top_pressure, 900.0);
    }

    #[test]
    fn test_extract_rejects_bad_tolerance() {
        let reader = InMemoryGrid::new("empty");
        let mut config = ExtractConfig::default();
        config.tolerance = Tolerance::new(0.0, 0.5);

        let result = extract(&reader, TargetPoint::new(0.0, 0.0), &config);
        assert!(matches!(result, Err(ExtractError::InvalidTolerance { .. })));
    }

    #[test]
    fn test_extract_missing_variable_is_unreadable() {
        let reader = InMemoryGrid::new("empty");
        let result = extract(&reader, TargetPoint::new(0.0, 0.0), &ExtractConfig::default());
        assert!(matches!(result, Err(ExtractError::FileUnreadable { .. })));
    }

    #[test]
    fn test_extract_shape_mismatch_is_unreadable() {
        let reader = grid(
            vec![10.0, 11.0],
            vec![100.0],
            vec![3],
            vec![1.0, 2.0, 3.0],
            vec![0, 0, 0],
            vec![1.0, 1.0, 1.0],
            vec![500.0, 500.0, 500.0],
        );
        let result = extract(&reader, TargetPoint::new(10.0, 100.0), &ExtractConfig::default());
        assert!(matches!(
            result,
            Err(ExtractError::FileUnreadable {
                source: GridReadError::ShapeMismatch { .. },
                ..
            })
        ));
    }
}
