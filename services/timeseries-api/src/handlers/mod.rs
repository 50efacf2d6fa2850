//! HTTP request handlers.

pub mod error;
pub mod health;
pub mod plot;
