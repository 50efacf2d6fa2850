//! Query target points.

use serde::{Deserialize, Serialize};

/// A geographic query point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub lat: f64,
    pub lon: f64,
}

impl TargetPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that the point lies on the globe.
    ///
    /// Latitude must be within [-90, 90] and longitude within [-180, 180].
    /// Non-finite coordinates are rejected.
    pub fn validate(&self) -> Result<(), PointError> {
        if !self.lat.is_finite() || self.lat.abs() > 90.0 {
            return Err(PointError::LatitudeOutOfRange(self.lat));
        }
        if !self.lon.is_finite() || self.lon.abs() > 180.0 {
            return Err(PointError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

impl std::fmt::Display for TargetPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
