//! Tests for the time-series HTTP endpoints.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`
//! against granules written into a temporary directory.

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use test_utils::{create_axis, write_granule_in, GranuleSpec};
use timeseries_api::build_router;
use timeseries_api::config::ServiceConfig;
use timeseries_api::state::AppState;
use tower::ServiceExt;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Grid covering 4..8 N, 75..71 W around the default target.
fn granule(precip: f32, cloud: f32, pressure: f32) -> GranuleSpec {
    GranuleSpec::uniform(
        create_axis(4.0, 0.5, 9),
        create_axis(-75.0, 0.5, 9),
        precip,
        cloud,
        pressure,
    )
}

struct TestService {
    _data: TempDir,
    static_dir: TempDir,
    app: Router,
}

fn service_with(populate: impl FnOnce(&Path)) -> TestService {
    let data = tempfile::tempdir().unwrap();
    let static_dir = tempfile::tempdir().unwrap();
    populate(data.path());

    let mut config = ServiceConfig {
        data_dir: data.path().to_path_buf(),
        static_dir: static_dir.path().to_path_buf(),
        ..Default::default()
    };
    config.chart.width = 480;
    config.chart.height = 360;

    let state = Arc::new(AppState::bootstrap(config).unwrap());
    TestService {
        _data: data,
        static_dir,
        app: build_router(state),
    }
}

fn populated_service() -> TestService {
    service_with(|dir| {
        write_granule_in(dir, "2024.01.02", &granule(2.0, 60.0, 700.0));
        write_granule_in(dir, "2024.01.01", &granule(1.0, 50.0, 900.0));
    })
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_status() {
    let service = service_with(|_| {});
    let response = service.app.oneshot(get("/status")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_health() {
    let service = service_with(|_| {});
    let response = service.app.oneshot(get("/health")).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "timeseries-api");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// ============================================================================
// Charts
// ============================================================================

#[tokio::test]
async fn test_generate_plot_returns_png() {
    let service = populated_service();
    let response = service
        .app
        .oneshot(post_json("/generate_plot", r#"{"lat": 5.7141, "lon": -72.9339}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let png = body_bytes(response).await;
    assert_eq!(&png[..8], &PNG_SIGNATURE);
}

#[tokio::test]
async fn test_generate_plot_accepts_trailing_slash() {
    let service = populated_service();
    let response = service
        .app
        .oneshot(post_json("/generate_plot/", r#"{"lat": 5.0, "lon": -73.0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_plot_saves_latest_chart() {
    let service = populated_service();
    let response = service.app.clone().oneshot(get("/plot")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let png = body_bytes(response).await;

    let saved = std::fs::read(service.static_dir.path().join("chart.png")).unwrap();
    assert_eq!(saved, png);

    let response = service.app.oneshot(get("/static/chart.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, png);
}

#[tokio::test]
async fn test_plot_outside_coverage_still_renders() {
    let service = populated_service();
    let response = service.app.oneshot(get("/plot?lat=-40&lon=100")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Series
// ============================================================================

#[tokio::test]
async fn test_timeseries_sorted_by_date() {
    let service = populated_service();
    let response = service.app.oneshot(get("/timeseries?lat=5.7&lon=-72.9")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["dates"], serde_json::json!(["2024-01-01", "2024-01-02"]));
    assert_eq!(json["precipitation"], serde_json::json!([1.0, 2.0]));
    assert_eq!(json["cloud_fraction"], serde_json::json!([0.5, 0.6]));
    assert_eq!(json["cloud_top_pressure"], serde_json::json!([900.0, 700.0]));
    assert_eq!(json["report"]["processed"], 2);
}

#[tokio::test]
async fn test_timeseries_missing_values_are_null() {
    let service = populated_service();
    let response = service.app.oneshot(get("/timeseries?lat=-40&lon=100")).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(json["precipitation"], serde_json::json!([null, null]));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_empty_directory_is_not_found() {
    let service = service_with(|_| {});
    let response = service.app.oneshot(get("/plot")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["status"], "no_data");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_invalid_target_is_bad_request() {
    let service = populated_service();
    let response = service
        .app
        .oneshot(post_json("/generate_plot", r#"{"lat": 120.0, "lon": 0.0}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "invalid_request");
}

#[tokio::test]
async fn test_missing_data_directory_is_server_error() {
    let static_dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        data_dir: static_dir.path().join("does-not-exist"),
        static_dir: static_dir.path().to_path_buf(),
        ..Default::default()
    };
    let app = build_router(Arc::new(AppState::new(config)));

    let response = app.oneshot(get("/timeseries")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["status"], "source_unavailable");
}
