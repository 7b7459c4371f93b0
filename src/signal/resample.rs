//! Linear resampling and interpolation.

/// Resample to `new_size` points by linear interpolation over evenly spaced
/// virtual indices spanning `0..=a.len()-1`.
///
/// Empty input or `new_size == 0` returns the input unchanged.
pub fn resample(a: &[f64], new_size: usize) -> Vec<f64> {
    if a.is_empty() || new_size == 0 {
        return a.to_vec();
    }
    if new_size == 1 {
        return vec![a[0]];
    }
    let last = a.len() - 1;
    let ratio = last as f64 / (new_size - 1) as f64;
    (0..new_size)
        .map(|i| {
            let idx = i as f64 * ratio;
            let i0 = (idx as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = idx - i0 as f64;
            a[i0] * (1.0 - frac) + a[i1] * frac
        })
        .collect()
}

/// Piecewise-linear interpolation of the knots `(x, y)` at `x_new`.
///
/// `x` must be ascending. Queries at or below `x[0]` read `y[0]`; queries
/// beyond the last knot read the last `y`. If `x` and `y` differ in length
/// or are empty, `x_new` is returned unchanged.
pub fn interp_linear(x: &[f64], y: &[f64], x_new: &[f64]) -> Vec<f64> {
    if x.len() != y.len() || x.is_empty() {
        return x_new.to_vec();
    }
    let last = x.len() - 1;
    x_new
        .iter()
        .map(|&xi| {
            // First segment whose right knot reaches xi.
            let j = x[1..].iter().position(|&xk| xk >= xi).unwrap_or(last);
            if j >= last {
                y[last]
            } else if xi <= x[0] {
                y[0]
            } else {
                let t = (xi - x[j]) / (x[j + 1] - x[j]);
                y[j] * (1.0 - t) + y[j + 1] * t
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_upsamples_linearly() {
        assert_eq!(resample(&[0.0, 10.0], 5), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn resample_keeps_endpoints() {
        let out = resample(&[1.0, 5.0, 2.0, 8.0, 3.0], 3);
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
        assert_eq!(resample(&[4.0, 5.0], 1), vec![4.0]);
        assert_eq!(resample(&[4.0], 3), vec![4.0, 4.0, 4.0]);
        assert_eq!(resample(&[4.0, 5.0], 0), vec![4.0, 5.0]);
    }

    #[test]
    fn interp_clamps_outside_knots() {
        let x = [0.0, 1.0, 2.0];
        let y = [10.0, 20.0, 40.0];
        assert_eq!(
            interp_linear(&x, &y, &[-1.0, 0.0, 0.5, 1.0, 1.5, 2.0, 9.0]),
            vec![10.0, 10.0, 15.0, 20.0, 30.0, 40.0, 40.0]
        );
    }

    #[test]
    fn interp_mismatched_knots_pass_queries_through() {
        assert_eq!(interp_linear(&[0.0], &[], &[1.0, 2.0]), vec![1.0, 2.0]);
        assert_eq!(interp_linear(&[], &[], &[3.0]), vec![3.0]);
    }

    #[test]
    fn interp_single_knot_is_constant() {
        assert_eq!(interp_linear(&[1.0], &[7.0], &[0.0, 5.0]), vec![7.0, 7.0]);
    }
}
