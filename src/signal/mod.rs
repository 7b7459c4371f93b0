//! Numeric function library: pure functions over `&[f64]`.
//!
//! ```text
//!   arith        elementwise + - * /, scale/offset, abs/sqrt/log/…
//!   stats        sum, mean, variance, …, normalize, standardize
//!   filter       moving average, median, single-pole low/high pass
//!   calculus     derivative, integral, cumsum
//!   spectral     radix-2 FFT magnitude/phase/frequency/power
//!   correlation  cross-correlation, Pearson coefficient
//!   resample     resample, interp_linear
//!   time         timestamp → seconds from zero
//!   generate     linspace, zeros, ones, sine_wave
//! ```
//!
//! None of these hold state. Undefined cases (empty input, zero range,
//! zero divisor, non-positive logarithm argument) resolve to a fixed finite
//! value instead of an error or NaN.

pub mod arith;
pub mod calculus;
pub mod correlation;
pub mod filter;
pub mod generate;
pub mod resample;
pub mod spectral;
pub mod stats;
pub mod time;
