//! Elementwise arithmetic and elementwise math functions.
//!
//! Binary operations truncate to the shorter input. Functions with a
//! restricted domain map out-of-domain inputs to finite values instead of
//! producing NaN or infinities.

fn zip_with(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    zip_with(a, b, |x, y| x + y)
}

pub fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    zip_with(a, b, |x, y| x - y)
}

pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    zip_with(a, b, |x, y| x * y)
}

/// Elementwise `a / b`; a zero divisor yields 0 for that element.
pub fn divide(a: &[f64], b: &[f64]) -> Vec<f64> {
    zip_with(a, b, |x, y| if y != 0.0 { x / y } else { 0.0 })
}

pub fn scale(a: &[f64], factor: f64) -> Vec<f64> {
    a.iter().map(|v| v * factor).collect()
}

pub fn offset(a: &[f64], value: f64) -> Vec<f64> {
    a.iter().map(|v| v + value).collect()
}

// ---------------------------------------------------------------------------
// Elementwise math
// ---------------------------------------------------------------------------

pub fn abs(a: &[f64]) -> Vec<f64> {
    a.iter().map(|v| v.abs()).collect()
}

/// Square root with negative inputs clamped to 0.
pub fn sqrt(a: &[f64]) -> Vec<f64> {
    a.iter().map(|v| v.max(0.0).sqrt()).collect()
}

pub fn pow(a: &[f64], exponent: f64) -> Vec<f64> {
    a.iter().map(|v| v.powf(exponent)).collect()
}

/// Natural log; non-positive inputs map to 0.
pub fn ln(a: &[f64]) -> Vec<f64> {
    a.iter().map(|&v| if v > 0.0 { v.ln() } else { 0.0 }).collect()
}

/// Base-10 log; non-positive inputs map to 0.
pub fn log10(a: &[f64]) -> Vec<f64> {
    a.iter().map(|&v| if v > 0.0 { v.log10() } else { 0.0 }).collect()
}

pub fn exp(a: &[f64]) -> Vec<f64> {
    a.iter().map(|v| v.exp()).collect()
}

pub fn sin(a: &[f64]) -> Vec<f64> {
    a.iter().map(|v| v.sin()).collect()
}

pub fn cos(a: &[f64]) -> Vec<f64> {
    a.iter().map(|v| v.cos()).collect()
}

pub fn tan(a: &[f64]) -> Vec<f64> {
    a.iter().map(|v| v.tan()).collect()
}
