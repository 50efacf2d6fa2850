//! Liveness handlers.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /status
pub async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "timeseries-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}
