//! Time-series API library.
//!
//! Exposes the router, handlers and configuration so the binary and the
//! integration tests build the same service.

pub mod config;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router for the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Charts
        .route("/generate_plot", post(handlers::plot::generate_plot_handler))
        .route("/generate_plot/", post(handlers::plot::generate_plot_handler))
        .route("/plot", get(handlers::plot::plot_handler))
        .route("/generar_grafico", get(handlers::plot::plot_handler))
        // Series as JSON
        .route("/timeseries", get(handlers::plot::timeseries_handler))
        // Health
        .route("/status", get(handlers::health::status_handler))
        .route("/health", get(handlers::health::health_handler))
        .nest_service("/static", static_files)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
