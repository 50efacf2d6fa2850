//! Grid data held in memory.

use std::collections::HashMap;

use crate::array::GridArray;
use crate::error::{GridReadError, GridReadResult};
use crate::format::GridFormat;
use crate::GridFileReader;

/// A [`GridFileReader`] over arrays that are already loaded.
///
/// Reads hand out clones, so the stored arrays are never modified.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGrid {
    source: String,
    variables: HashMap<String, GridArray<f32>>,
    flags: HashMap<String, GridArray<i32>>,
}

impl InMemoryGrid {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Add a physical-valued variable.
    pub fn with_variable(mut self, name: impl Into<String>, array: GridArray<f32>) -> Self {
        self.variables.insert(name.into(), array);
        self
    }

    /// Add an integer flag variable such as a quality code.
    pub fn with_flags(mut self, name: impl Into<String>, array: GridArray<i32>) -> Self {
        self.flags.insert(name.into(), array);
        self
    }
}

impl GridFileReader for InMemoryGrid {
    fn format(&self) -> GridFormat {
        GridFormat::NetCdf
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn read_variable(&self, name: &str) -> GridReadResult<GridArray<f32>> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| GridReadError::MissingData(format!("{} variable in {}", name, self.source)))
    }

    fn read_flags(&self, name: &str) -> GridReadResult<GridArray<i32>> {
        if let Some(flags) = self.flags.get(name) {
            return Ok(flags.clone());
        }
        // Flags stored as floats are truncated the same way file readers do.
        self.variables
            .get(name)
            .map(|arr| GridArray {
                data: arr.data.iter().map(|&v| v as i32).collect(),
                shape: arr.shape.clone(),
            })
            .ok_or_else(|| GridReadError::MissingData(format!("{} variable in {}", name, self.source)))
    }
}
