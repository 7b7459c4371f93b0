//! Array generators.

use std::f64::consts::PI;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

pub fn zeros(n: usize) -> Vec<f64> {
    vec![0.0; n]
}

pub fn ones(n: usize) -> Vec<f64> {
    vec![1.0; n]
}

/// `amplitude · sin(2π · frequency · i / n + phase)` for `i in 0..n`.
///
/// `frequency` counts cycles over the whole array, so an integer frequency
/// lands exactly on FFT bin `frequency`.
pub fn sine_wave(n: usize, frequency: f64, amplitude: f64, phase: f64) -> Vec<f64> {
    (0..n)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f64 / n as f64 + phase).sin())
        .collect()
}
