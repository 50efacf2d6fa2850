//! Time-series API server
//!
//! Serves regional daily means of precipitation, cloud fraction and
//! cloud-top pressure as charts and JSON.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use timeseries_api::build_router;
use timeseries_api::config::ServiceConfig;
use timeseries_api::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

/// Time-series API server
#[derive(Parser, Debug)]
#[command(name = "timeseries-api")]
#[command(about = "Regional satellite time series as charts and JSON")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "TIMESERIES_LISTEN_ADDR")]
    listen: String,

    /// Service configuration file (YAML)
    #[arg(short, long, default_value = "config/timeseries.yaml", env = "TIMESERIES_CONFIG")]
    config: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "json")]
    log_format: LogFormat,

    /// Number of worker threads
    #[arg(long, env = "TIMESERIES_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run_server(args: Args) -> Result<()> {
    init_tracing(&args);

    info!("Starting time-series API server");

    // libhdf5 prints its own error stack for every unreadable file
    grid_reader::silence_hdf5_errors();

    let config = ServiceConfig::load(&args.config)?;
    info!(
        data_dir = %config.data_dir.display(),
        static_dir = %config.static_dir.display(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::bootstrap(config)?);
    let app = build_router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Time-series API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
