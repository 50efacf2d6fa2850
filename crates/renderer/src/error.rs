//! Rendering errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Series lengths or chart dimensions are unusable
    #[error("invalid chart input: {0}")]
    InvalidInput(String),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
