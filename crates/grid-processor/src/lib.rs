//! Regional time-series extraction from gridded satellite products.
//!
//! This crate turns a directory of daily grid files into three aligned
//! series (precipitation, cloud fraction, cloud-top pressure) for one
//! target point.
//!
//! # Architecture
//!
//! ```text
//! BatchAggregator::aggregate(target)
//!      │
//!      ├─► discover_files (extension filter, sorted by name)
//!      │
//!      ├─► per file, on the rayon pool:
//!      │         │
//!      │         ├─► date_from_filename ── fails ──► skipped (DateParseFailure)
//!      │         │
//!      │         └─► extract_file ── FileUnreadable ──► skipped
//!      │                   │
//!      │                   └─► ExtractionResult (NaN where no data)
//!      │
//!      └─► stable sort by date ──► TimeSeries
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{BatchAggregator, BatchConfig};
//! use sat_common::TargetPoint;
//!
//! let aggregator = BatchAggregator::new(BatchConfig::new("files"));
//! let series = aggregator.aggregate(TargetPoint::new(5.7141, -72.9339))?;
//! for (date, p) in series.dates.iter().zip(&series.precipitation) {
//!     println!("{date}: {p}");
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod stats;

// Re-export commonly used types at crate root
pub use batch::{BatchAggregator, BatchReport, DailySample, SkipReason, SkippedFile, TimeSeries};
pub use config::{BatchConfig, ExtractConfig};
pub use error::{BatchError, BatchResult, ExtractError, ExtractResult};
pub use extract::{extract, extract_file, validate_request, ExtractionResult};
pub use stats::nan_mean;
