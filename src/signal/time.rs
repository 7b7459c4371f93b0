//! Timestamp columns to zero-based time axes.

/// `(a[i] - a[0]) * scale_factor`.
pub fn time_from_zero(a: &[f64], scale_factor: f64) -> Vec<f64> {
    let Some(&start) = a.first() else {
        return Vec::new();
    };
    a.iter().map(|v| (v - start) * scale_factor).collect()
}

/// Milliseconds to seconds from the first sample.
pub fn ms_to_s_from_zero(a: &[f64]) -> Vec<f64> {
    time_from_zero(a, 1e-3)
}

/// Microseconds to seconds from the first sample.
pub fn us_to_s_from_zero(a: &[f64]) -> Vec<f64> {
    time_from_zero(a, 1e-6)
}

/// Nanoseconds to seconds from the first sample.
pub fn ns_to_s_from_zero(a: &[f64]) -> Vec<f64> {
    time_from_zero(a, 1e-9)
}
