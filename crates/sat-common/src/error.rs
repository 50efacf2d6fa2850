//! Error types surfaced at the service boundary.

use thiserror::Error;

/// Request-level errors reported to HTTP clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    // === Request Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid target point: {0}")]
    InvalidTarget(String),

    // === Data Errors ===
    #[error("No data: {0}")]
    NoData(String),

    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Short machine-readable status string for JSON payloads.
    pub fn status_code_name(&self) -> &'static str {
        match self {
            ServiceError::InvalidParameter { .. } | ServiceError::InvalidTarget(_) => {
                "invalid_request"
            }
            ServiceError::NoData(_) => "no_data",
            ServiceError::SourceUnavailable(_) => "source_unavailable",
            ServiceError::RenderError(_) | ServiceError::InternalError(_) => "error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidParameter { .. } | ServiceError::InvalidTarget(_) => 400,
            ServiceError::NoData(_) => 404,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let bad = ServiceError::InvalidTarget("lat 95".to_string());
        assert_eq!(bad.http_status_code(), 400);
        assert_eq!(bad.status_code_name(), "invalid_request");

        let missing = ServiceError::NoData("empty".to_string());
        assert_eq!(missing.http_status_code(), 404);
        assert_eq!(missing.status_code_name(), "no_data");

        let down = ServiceError::SourceUnavailable("files".to_string());
        assert_eq!(down.http_status_code(), 500);
        assert_eq!(down.status_code_name(), "source_unavailable");
    }
}
