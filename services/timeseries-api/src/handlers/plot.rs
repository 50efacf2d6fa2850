//! Chart and series handlers.
//!
//! Aggregation reads every grid file in the data directory, so the work
//! runs on the blocking pool rather than on the async workers.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use grid_processor::TimeSeries;
use renderer::{render_timeseries_chart, ChartData};
use sat_common::TargetPoint;
use serde::Deserialize;
use tracing::{info, warn};

use super::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET endpoints; missing values fall back to the
/// configured default target.
#[derive(Debug, Default, Deserialize)]
pub struct TargetQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl TargetQuery {
    pub fn resolve(&self, default: TargetPoint) -> TargetPoint {
        TargetPoint::new(self.lat.unwrap_or(default.lat), self.lon.unwrap_or(default.lon))
    }
}

/// POST /generate_plot
pub async fn generate_plot_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(target): Json<TargetPoint>,
) -> Result<Response, ApiError> {
    info!(target = %target, "Chart requested");
    let png = tokio::task::spawn_blocking(move || render_chart(&state, target)).await??;
    Ok(png_response(png))
}

/// GET /plot?lat=&lon=
///
/// Also stores the chart as the latest one under the static directory.
pub async fn plot_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TargetQuery>,
) -> Result<Response, ApiError> {
    let target = query.resolve(state.config.default_target);
    info!(target = %target, "Chart requested");

    let png = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let png = render_chart(&state, target)?;
        let path = state.config.chart_path();
        if let Err(e) = save_chart(&state.config.static_dir, &path, &png) {
            warn!(path = %path.display(), error = %e, "Failed to save latest chart");
        }
        Ok(png)
    })
    .await??;

    Ok(png_response(png))
}

/// GET /timeseries?lat=&lon=
///
/// Missing samples serialize as `null`.
pub async fn timeseries_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<TimeSeries>, ApiError> {
    let target = query.resolve(state.config.default_target);
    let series = tokio::task::spawn_blocking(move || state.aggregator.aggregate(target)).await??;
    Ok(Json(series))
}

fn render_chart(state: &AppState, target: TargetPoint) -> Result<Vec<u8>, ApiError> {
    let series = state.aggregator.aggregate(target)?;
    let png = render_timeseries_chart(&chart_data(&series), &state.config.chart)?;
    info!(target = %target, points = series.len(), bytes = png.len(), "Chart rendered");
    Ok(png)
}

pub fn chart_data(series: &TimeSeries) -> ChartData {
    ChartData::new(
        series.dates.clone(),
        series.precipitation.clone(),
        series.cloud_fraction.clone(),
        series.cloud_top_pressure.clone(),
    )
}

/// Write `png` to `path` through a temporary file in `dir`, so readers
/// never see a partial chart.
fn save_chart(dir: &Path, path: &Path, png: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(png)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn png_response(png: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        png,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let default = TargetPoint::new(5.7141, -72.9339);
        let query = TargetQuery {
            lat: Some(10.0),
            lon: None,
        };
        assert_eq!(query.resolve(default), TargetPoint::new(10.0, -72.9339));
        assert_eq!(TargetQuery::default().resolve(default), default);
    }

    #[test]
    fn test_save_chart_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        save_chart(dir.path(), &path, b"first").unwrap();
        save_chart(dir.path(), &path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
