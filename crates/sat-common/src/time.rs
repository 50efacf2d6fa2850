//! Date handling for daily satellite granules.

use chrono::NaiveDate;

/// Parse the observation date embedded in a granule file name.
///
/// The name is split on `.` and fields 1 to 3 are read as `YYYY.MM.DD`,
/// e.g. `AIRS.2024.03.15.L3.RetStd_IR001.v7.0.3.0.G24076.hdf`.
pub fn date_from_filename(file_name: &str) -> Result<NaiveDate, TimeParseError> {
    let fields: Vec<&str> = file_name.split('.').collect();
    if fields.len() < 4 {
        return Err(TimeParseError::MissingFields(file_name.to_string()));
    }

    let date_str = format!("{}.{}.{}", fields[1], fields[2], fields[3]);
    NaiveDate::parse_from_str(&date_str, "%Y.%m.%d").map_err(|e| TimeParseError::InvalidDate {
        file_name: file_name.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("file name '{0}' has no YYYY.MM.DD fields")]
    MissingFields(String),

    #[error("invalid date in file name '{file_name}': {reason}")]
    InvalidDate { file_name: String, reason: String },
}
