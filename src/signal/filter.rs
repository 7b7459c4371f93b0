//! Smoothing filters.

/// Centered window bounds `[start, end)` around `i`, shrunk at the edges.
fn window_bounds(i: usize, len: usize, window: usize) -> (usize, usize) {
    let half = window / 2;
    (i.saturating_sub(half), (i + half + 1).min(len))
}

/// Centered moving average.
///
/// The window is clamped to the input length and shrinks near the ends
/// instead of padding. A window of 0 returns the input unchanged.
pub fn moving_average(a: &[f64], window: usize) -> Vec<f64> {
    if a.is_empty() || window < 1 {
        return a.to_vec();
    }
    let window = window.min(a.len());
    (0..a.len())
        .map(|i| {
            let (start, end) = window_bounds(i, a.len(), window);
            a[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect()
}

/// Centered running median with the same window rules as [`moving_average`].
///
/// For an even-sized (edge) window the upper middle element is taken.
pub fn median_filter(a: &[f64], window: usize) -> Vec<f64> {
    if a.is_empty() || window < 1 {
        return a.to_vec();
    }
    let window = window.min(a.len());
    let mut buf = Vec::with_capacity(window + 1);
    (0..a.len())
        .map(|i| {
            let (start, end) = window_bounds(i, a.len(), window);
            buf.clear();
            buf.extend_from_slice(&a[start..end]);
            buf.sort_by(f64::total_cmp);
            buf[buf.len() / 2]
        })
        .collect()
}

/// Single-pole exponential smoothing: `y[i] = α·x[i] + (1−α)·y[i−1]`,
/// `y[0] = x[0]`, with `α = clamp(cutoff_ratio, 0, 1)`.
pub fn lowpass(a: &[f64], cutoff_ratio: f64) -> Vec<f64> {
    let alpha = cutoff_ratio.clamp(0.0, 1.0);
    let mut out = Vec::with_capacity(a.len());
    let mut prev = match a.first() {
        Some(&first) => first,
        None => return out,
    };
    out.push(prev);
    for &x in &a[1..] {
        prev = alpha * x + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// Complement of [`lowpass`]: `a − lowpass(a)`.
pub fn highpass(a: &[f64], cutoff_ratio: f64) -> Vec<f64> {
    let low = lowpass(a, cutoff_ratio);
    a.iter().zip(&low).map(|(x, l)| x - l).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn moving_average_shrinks_at_edges() {
        let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out, vec![1.5, 2.0, 3.0, 4.0, 4.5]);
    }

    #[test]
    fn moving_average_window_clamped_to_length() {
        let out = moving_average(&[2.0, 4.0], 100);
        assert_eq!(out, vec![3.0, 3.0]);
        assert_eq!(moving_average(&[1.0, 2.0], 0), vec![1.0, 2.0]);
    }

    #[test]
    fn median_filter_removes_spike() {
        let out = median_filter(&[1.0, 1.0, 50.0, 1.0, 1.0], 3);
        assert_eq!(out, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn lowpass_is_a_recurrence_on_outputs() {
        let out = lowpass(&[0.0, 10.0, 10.0], 0.5);
        assert_eq!(out, vec![0.0, 5.0, 7.5]);
    }

    #[test]
    fn lowpass_unity_cutoff_is_identity() {
        let a = [3.0, -1.5, 8.25, 0.0];
        assert_eq!(lowpass(&a, 1.0), a.to_vec());
        assert_eq!(lowpass(&a, 7.0), a.to_vec());
        assert_eq!(lowpass(&a, -1.0), vec![3.0; 4]);
        assert!(lowpass(&[], 0.3).is_empty());
    }

    #[test]
    fn highpass_and_lowpass_sum_to_input() {
        let a = [1.0, 4.0, -2.0, 8.0, 3.5, 0.25];
        for c in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let low = lowpass(&a, c);
            let high = highpass(&a, c);
            for i in 0..a.len() {
                assert_relative_eq!(low[i] + high[i], a[i], epsilon = 1e-12);
            }
        }
    }
}
