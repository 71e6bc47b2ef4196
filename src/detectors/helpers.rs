//! Rolling-window helpers shared by labelers
//!
//! A window value is defined only once `period` rows are available and none of them is NaN.

/// Rolling maximum over the `period` rows ending at each index (inclusive).
pub fn rolling_max(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, f64::max)
}

/// Rolling minimum over the `period` rows ending at each index (inclusive).
pub fn rolling_min(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, f64::min)
}

fn rolling(values: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|at| {
            if period == 0 || at + 1 < period {
                return None;
            }
            let slice = &values[at + 1 - period..=at];
            if slice.iter().any(|v| v.is_nan()) {
                return None;
            }
            slice.iter().copied().reduce(pick)
        })
        .collect()
}

/// Neighbours of row `at`: (previous, next). Missing at the edges.
#[inline]
pub fn neighbours(values: &[f64], at: usize) -> (Option<f64>, Option<f64>) {
    let prev = at.checked_sub(1).and_then(|i| values.get(i)).copied();
    let next = values.get(at + 1).copied();
    (prev, next)
}
