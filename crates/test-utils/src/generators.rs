//! Test data generators for creating synthetic grid data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Evenly spaced axis values: `start, start + step, ...` (`count` values).
///
/// # Example
///
/// ```
/// use test_utils::create_axis;
///
/// assert_eq!(create_axis(-1.0, 0.5, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
/// ```
pub fn create_axis(start: f32, step: f32, count: usize) -> Vec<f32> {
    (0..count).map(|i| start + step * i as f32).collect()
}

/// A grid of `width * height` cells all holding `value`.
pub fn create_uniform_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Cloud-top pressures sweeping 50..1500 hPa so that both ends fall outside
/// the plausible range.
pub fn create_pressure_grid(width: usize, height: usize) -> Vec<f32> {
    let n = (width * height).max(1);
    (0..width * height)
        .map(|i| 50.0 + 1450.0 * i as f32 / (n - 1).max(1) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_axis() {
        assert_eq!(create_axis(10.0, 10.0, 2), vec![10.0, 20.0]);
        assert!(create_axis(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_create_uniform_grid() {
        let grid = create_uniform_grid(3, 2, 50.0);
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|&v| v == 50.0));
    }

    #[test]
    fn test_create_pressure_grid_spans_range() {
        let grid = create_pressure_grid(4, 4);
        assert_eq!(grid[0], 50.0);
        assert_eq!(grid[15], 1500.0);
    }
}
