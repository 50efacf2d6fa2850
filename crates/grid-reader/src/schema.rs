//! Variable names used to locate the fields inside a grid file.

use serde::{Deserialize, Serialize};

/// Names of the six variables an extraction reads.
///
/// Defaults match the AIRS Level-3 daily standard retrieval product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableNames {
    pub latitude: String,
    pub longitude: String,
    pub precipitation: String,
    pub cloud_fraction: String,
    pub cloud_top_pressure: String,
    pub precipitation_quality: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            latitude: "GridCenterLatitude".to_string(),
            longitude: "GridCenterLongitude".to_string(),
            precipitation: "IR_Precip_Est".to_string(),
            cloud_fraction: "CldFrcStd".to_string(),
            cloud_top_pressure: "PCldTopStd".to_string(),
            precipitation_quality: "IR_Precip_Est_QC".to_string(),
        }
    }
}
