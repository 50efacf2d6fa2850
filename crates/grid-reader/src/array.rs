//! Dense row-major arrays as read from grid files.

use crate::error::{GridReadError, GridReadResult};

/// A dense N-dimensional array in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridArray<T = f32> {
    pub data: Vec<T>,
    pub shape: Vec<usize>,
}

impl<T> GridArray<T> {
    /// Create an array, checking that `shape` accounts for every element.
    pub fn new(name: &str, data: Vec<T>, shape: Vec<usize>) -> GridReadResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(GridReadError::shape_mismatch(name, &shape, &[data.len()]));
        }
        Ok(Self { data, shape })
    }

    /// A 1-D array over `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            data,
            shape: vec![len],
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shape with leading length-1 axes removed (e.g. `[1, 180, 360]` → `[180, 360]`).
    pub fn spatial_shape(&self) -> &[usize] {
        let leading = self
            .shape
            .iter()
            .take_while(|&&d| d == 1)
            .count()
            .min(self.shape.len().saturating_sub(1));
        &self.shape[leading..]
    }

    /// Borrow the data when the array is one-dimensional.
    pub fn as_1d(&self) -> Option<&[T]> {
        (self.ndim() == 1).then_some(self.data.as_slice())
    }
}

/// Expand two coordinate axes into a 2-D mesh.
///
/// Returns `(lat_grid, lon_grid)`, both shaped `[lats.len(), lons.len()]`:
/// every row holds one latitude and every column one longitude.
pub fn meshgrid(lats: &[f32], lons: &[f32]) -> (GridArray<f32>, GridArray<f32>) {
    let rows = lats.len();
    let cols = lons.len();

    let mut lat_grid = Vec::with_capacity(rows * cols);
    let mut lon_grid = Vec::with_capacity(rows * cols);
    for &lat in lats {
        for &lon in lons {
            lat_grid.push(lat);
            lon_grid.push(lon);
        }
    }

    (
        GridArray {
            data: lat_grid,
            shape: vec![rows, cols],
        },
        GridArray {
            data: lon_grid,
            shape: vec![rows, cols],
        },
    )
}
