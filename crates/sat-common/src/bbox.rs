//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::point::TargetPoint;

/// Half-widths of a query box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub lat: f64,
    pub lon: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { lat: 0.5, lon: 0.5 }
    }
}

impl Tolerance {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both half-widths must be finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.lat > 0.0 && self.lon > 0.0
    }
}

/// A geographic bounding box in degrees.
///
/// Both edges are inclusive: a cell lying exactly on an edge is inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box from edge coordinates.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The box centred on `target` extending `tolerance` in each direction.
    pub fn around(target: TargetPoint, tolerance: Tolerance) -> Self {
        Self {
            min_lat: target.lat - tolerance.lat,
            max_lat: target.lat + tolerance.lat,
            min_lon: target.lon - tolerance.lon,
            max_lon: target.lon + tolerance.lon,
        }
    }

    /// Height of the box in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Width of the box in degrees of longitude.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Check if a point is contained within this bbox.
    ///
    /// NaN coordinates are never contained.
    #[inline]
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Check if a grid cell with single-precision coordinates is contained.
    ///
    /// The edges are rounded to f32 and compared in that precision, so a
    /// cell stored at exactly `target ± tolerance` counts as on the edge.
    #[inline]
    pub fn contains_cell(&self, lat: f32, lon: f32) -> bool {
        lat >= self.min_lat as f32
            && lat <= self.max_lat as f32
            && lon >= self.min_lon as f32
            && lon <= self.max_lon as f32
    }
}
