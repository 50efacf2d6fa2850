//! NaN-aware reductions.

/// Arithmetic mean of the non-NaN values.
///
/// Returns NaN when `values` is empty or holds only NaN. Accumulates in f64.
pub fn nan_mean(values: &[f32]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0f64, 0usize), |(sum, count), &v| (sum + v as f64, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
