//! Summary statistics and normalization.
//!
//! Every statistic returns 0 where it is undefined (empty input, or fewer
//! than two samples for the sample variance) rather than failing.

pub fn sum(a: &[f64]) -> f64 {
    a.iter().sum()
}

pub fn mean(a: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    sum(a) / a.len() as f64
}

/// Sample variance (divides by `n - 1`).
pub fn variance(a: &[f64]) -> f64 {
    if a.len() < 2 {
        return 0.0;
    }
    let m = mean(a);
    let ss: f64 = a.iter().map(|v| (v - m) * (v - m)).sum();
    ss / (a.len() - 1) as f64
}

pub fn std_dev(a: &[f64]) -> f64 {
    variance(a).sqrt()
}

pub fn min(a: &[f64]) -> f64 {
    a.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

pub fn max(a: &[f64]) -> f64 {
    a.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Root mean square.
pub fn rms(a: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    (a.iter().map(|v| v * v).sum::<f64>() / a.len() as f64).sqrt()
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Min-max scaling to `[0, 1]`. A constant input maps to 0.5 everywhere.
pub fn normalize(a: &[f64]) -> Vec<f64> {
    normalize_range(a, 0.0, 1.0)
}

/// Min-max scaling to `[new_min, new_max]`. A constant input maps to the
/// midpoint of the target range.
pub fn normalize_range(a: &[f64], new_min: f64, new_max: f64) -> Vec<f64> {
    let lo = min(a);
    let range = max(a) - lo;
    if range == 0.0 {
        return vec![(new_min + new_max) / 2.0; a.len()];
    }
    a.iter()
        .map(|v| new_min + (v - lo) / range * (new_max - new_min))
        .collect()
}

/// Z-score. Zero standard deviation maps every element to 0.
pub fn standardize(a: &[f64]) -> Vec<f64> {
    let s = std_dev(a);
    if s == 0.0 {
        return vec![0.0; a.len()];
    }
    let m = mean(a);
    a.iter().map(|v| (v - m) / s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn undefined_statistics_are_zero() {
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[4.0]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(min(&[]), 0.0);
        assert_eq!(max(&[]), 0.0);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn sample_variance() {
        let a = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&a), 5.0);
        assert_relative_eq!(variance(&a), 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&a), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(min(&a), 2.0);
        assert_eq!(max(&a), 9.0);
    }

    #[test]
    fn rms_of_square_wave() {
        assert_relative_eq!(rms(&[1.0, -1.0, 1.0, -1.0]), 1.0);
    }

    #[test]
    fn normalize_maps_into_unit_interval() {
        assert_eq!(
            normalize(&[10.0, 20.0, 30.0, 40.0, 50.0]),
            vec![0.0, 0.25, 0.5, 0.75, 1.0]
        );
        assert_eq!(normalize(&[3.0, 3.0, 3.0]), vec![0.5; 3]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn normalize_range_constant_fills_midpoint() {
        assert_eq!(normalize_range(&[7.0, 7.0], -1.0, 3.0), vec![1.0, 1.0]);
        assert_eq!(normalize_range(&[0.0, 5.0, 10.0], 100.0, 200.0), vec![100.0, 150.0, 200.0]);
    }

    #[test]
    fn standardize_has_zero_mean_unit_std() {
        let z = standardize(&[1.0, 2.0, 3.0, 10.0, -4.0]);
        assert_relative_eq!(mean(&z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&z), 1.0, epsilon = 1e-12);
        assert_eq!(standardize(&[2.0, 2.0]), vec![0.0, 0.0]);
        assert_eq!(standardize(&[2.0]), vec![0.0]);
    }
}
