/// Count-normalized cross-correlation.
///
/// For every lag in `-(n-1)..=(n-1)`, with `n = max(a.len(), b.len())`, the
/// output holds the mean of `a[i] * b[i + lag]` over the indices where both
/// exist (0 when there is no overlap). The result has `2n - 1` samples,
/// index `n - 1` being lag 0.
pub fn cross_correlation(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len()) as isize;
    if n == 0 {
        return Vec::new();
    }
    (-(n - 1)..n)
        .map(|lag| {
            let (sum, count) = a
                .iter()
                .enumerate()
                .filter_map(|(i, &x)| {
                    let j = i as isize + lag;
                    (j >= 0 && (j as usize) < b.len()).then(|| x * b[j as usize])
                })
                .fold((0.0, 0usize), |(s, c), p| (s + p, c + 1));
            if count > 0 {
                sum / count as f64
            } else {
                0.0
            }
        })
        .collect()
}

/// Pearson correlation over the first `min(a.len(), b.len())` samples.
///
/// Returns 0 with fewer than two samples or when either input is constant.
pub fn correlation_coefficient(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    (cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
}
