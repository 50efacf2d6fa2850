//! Common types and utilities shared across the sat-timeseries crates.

pub mod bbox;
pub mod error;
pub mod point;
pub mod time;

pub use bbox::{BoundingBox, Tolerance};
pub use error::ServiceError;
pub use point::{PointError, TargetPoint};
pub use time::{date_from_filename, TimeParseError};
