//! Radix-2 FFT and single-sided spectra.
//!
//! Inputs are zero-padded to the next power of two. Only the
//! non-negative-frequency half (`n/2 + 1` bins) is returned.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Smallest power of two `>= n` (1 for `n == 0`).
pub fn fft_size(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// [`fft_size`], or `None` when it does not fit in a `usize`.
pub fn checked_fft_size(n: usize) -> Option<usize> {
    n.max(1).checked_next_power_of_two()
}

/// In-place iterative Cooley–Tukey forward transform.
///
/// `data.len()` must be a power of two.
fn fft_in_place(data: &mut [Complex64]) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two(), "fft length must be a power of two");

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            data.swap(i, j);
        }
    }

    // Butterfly stages.
    let mut len = 2;
    while len <= n {
        let angle = -2.0 * PI / len as f64;
        let wn = Complex64::from_polar(1.0, angle);
        for chunk in data.chunks_exact_mut(len) {
            let (lo, hi) = chunk.split_at_mut(len / 2);
            let mut w = Complex64::new(1.0, 0.0);
            for (u, v) in lo.iter_mut().zip(hi.iter_mut()) {
                let t = w * *v;
                let a = *u;
                *u = a + t;
                *v = a - t;
                w *= wn;
            }
        }
        len <<= 1;
    }
}

/// Zero-pad `a` to a power of two and transform it.
fn padded_spectrum(a: &[f64]) -> Vec<Complex64> {
    let n = fft_size(a.len());
    let mut data: Vec<Complex64> = a.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    data.resize(n, Complex64::new(0.0, 0.0));
    fft_in_place(&mut data);
    data
}

/// Single-sided amplitude spectrum.
///
/// Bins are scaled by `2/n` so a real sinusoid reads at its peak amplitude;
/// the DC bin is scaled by `1/n`.
pub fn fft_magnitude(a: &[f64]) -> Vec<f64> {
    let spectrum = padded_spectrum(a);
    let n = spectrum.len();
    let mut out: Vec<f64> = spectrum[..=n / 2]
        .iter()
        .map(|c| c.norm() * 2.0 / n as f64)
        .collect();
    out[0] /= 2.0;
    out
}

/// Phase (radians) of each non-negative-frequency bin.
pub fn fft_phase(a: &[f64]) -> Vec<f64> {
    let spectrum = padded_spectrum(a);
    let n = spectrum.len();
    spectrum[..=n / 2].iter().map(|c| c.arg()).collect()
}

/// Frequency axis matching [`fft_magnitude`] for an `n`-sample input.
pub fn fft_frequency(n: usize, sample_rate: f64) -> Vec<f64> {
    let size = fft_size(n);
    (0..=size / 2)
        .map(|i| i as f64 * sample_rate / size as f64)
        .collect()
}

/// Square of [`fft_magnitude`].
pub fn power_spectrum(a: &[f64]) -> Vec<f64> {
    fft_magnitude(a).into_iter().map(|m| m * m).collect()
}
