//! Mapping of pipeline errors to JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grid_processor::{BatchError, ExtractError};
use renderer::RenderError;
use sat_common::ServiceError;
use serde::Serialize;

/// JSON body of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

/// A `ServiceError` on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            status: self.0.status_code_name(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        let service = match &err {
            BatchError::SourceDirectory { .. } => ServiceError::SourceUnavailable(err.to_string()),
            BatchError::InvalidRequest(ExtractError::InvalidTarget(e)) => {
                ServiceError::InvalidTarget(e.to_string())
            }
            BatchError::InvalidRequest(e) => ServiceError::InvalidParameter {
                param: "tolerance".to_string(),
                message: e.to_string(),
            },
            BatchError::EmptyDataset(_) => ServiceError::NoData(err.to_string()),
        };
        Self(service)
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        Self(ServiceError::RenderError(err.to_string()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self(ServiceError::InternalError(format!("worker task failed: {}", err)))
    }
}
