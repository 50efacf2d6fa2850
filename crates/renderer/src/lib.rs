//! Image rendering for satellite time series.
//!
//! - Three-panel daily time-series charts
//! - PNG encoding (indexed when the palette allows, RGBA otherwise)

pub mod chart;
pub mod error;
pub mod png;
pub mod style;

pub use chart::{render_timeseries_chart, ChartData};
pub use error::RenderError;
pub use style::{ChartConfig, PanelStyle};
