//! Discrete derivative, integral and running sum.

/// Discrete derivative with sample spacing `dt`.
///
/// Forward difference at the first sample, backward at the last, central
/// difference elsewhere. Inputs shorter than two samples are returned
/// unchanged.
pub fn derivative(a: &[f64], dt: f64) -> Vec<f64> {
    let n = a.len();
    if n < 2 {
        return a.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    out.push((a[1] - a[0]) / dt);
    for i in 1..n - 1 {
        out.push((a[i + 1] - a[i - 1]) / (2.0 * dt));
    }
    out.push((a[n - 1] - a[n - 2]) / dt);
    out
}

/// Cumulative trapezoidal integral; the first element is 0.
pub fn integral(a: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(a.len());
    if a.is_empty() {
        return out;
    }
    let mut acc = 0.0;
    out.push(acc);
    for w in a.windows(2) {
        acc += (w[0] + w[1]) / 2.0 * dt;
        out.push(acc);
    }
    out
}

pub fn cumsum(a: &[f64]) -> Vec<f64> {
    a.iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}
