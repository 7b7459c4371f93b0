//! Registers the function library with the script runtime.
//!
//! Each catalogue entry becomes a method on the `math` value. Dispatch is a
//! fixed table of native closures; nothing is looked up by reflection.

use std::cell::Cell;
use std::rc::Rc;

use rhai::{Array, Dynamic, Engine, EvalAltResult, INT};

use super::convert::{array_to_vec, number, vec_to_array};
use crate::signal::{
    arith, calculus, correlation, filter, generate, resample, spectral, stats, time,
};

/// The value bound to `math` in every script.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathNamespace;

/// Longest array a generator may produce, adjustable between runs.
pub(crate) type GeneratorCap = Rc<Cell<usize>>;

type FnResult<T> = Result<T, Box<EvalAltResult>>;

// ---------------------------------------------------------------------------
// Argument conversion
// ---------------------------------------------------------------------------

fn array_arg(func: &str, param: &str, value: &Array) -> FnResult<Vec<f64>> {
    array_to_vec(value).map_err(|e| {
        format!(
            "math.{func}: `{param}[{}]` is {}, expected a number",
            e.index, e.type_name
        )
        .into()
    })
}

fn number_arg(func: &str, param: &str, value: &Dynamic) -> FnResult<f64> {
    number(value).ok_or_else(|| {
        format!(
            "math.{func}: `{param}` is {}, expected a number",
            value.type_name()
        )
        .into()
    })
}

/// Sizes and window lengths: negative counts as 0, fractions truncate.
fn count_arg(func: &str, param: &str, value: &Dynamic) -> FnResult<usize> {
    let n = number_arg(func, param, value)?;
    if !n.is_finite() {
        return Err(format!("math.{func}: `{param}` must be finite").into());
    }
    Ok(if n <= 0.0 { 0 } else { n as usize })
}

fn check_len(func: &str, len: usize, cap: &GeneratorCap) -> FnResult<()> {
    let max = cap.get();
    if len > max {
        return Err(format!("math.{func}: {len} samples exceeds the limit of {max}").into());
    }
    Ok(())
}

/// Inputs are padded to a power of two before the transform.
fn check_fft_len(func: &str, n: usize, cap: &GeneratorCap) -> FnResult<()> {
    check_len(func, n, cap)?;
    match spectral::checked_fft_size(n) {
        Some(size) => check_len(func, size, cap),
        None => Err(format!("math.{func}: {n} samples exceeds the limit of {}", cap.get()).into()),
    }
}

// ---------------------------------------------------------------------------
// Registration shapes
// ---------------------------------------------------------------------------

fn unary(engine: &mut Engine, name: &'static str, f: fn(&[f64]) -> Vec<f64>) {
    engine.register_fn(name, move |_: &mut MathNamespace, a: Array| -> FnResult<Array> {
        Ok(vec_to_array(&f(&array_arg(name, "a", &a)?)))
    });
}

fn reduce(engine: &mut Engine, name: &'static str, f: fn(&[f64]) -> f64) {
    engine.register_fn(name, move |_: &mut MathNamespace, a: Array| -> FnResult<f64> {
        Ok(f(&array_arg(name, "a", &a)?))
    });
}

fn binary(engine: &mut Engine, name: &'static str, f: fn(&[f64], &[f64]) -> Vec<f64>) {
    engine.register_fn(
        name,
        move |_: &mut MathNamespace, a: Array, b: Array| -> FnResult<Array> {
            let a = array_arg(name, "a", &a)?;
            let b = array_arg(name, "b", &b)?;
            Ok(vec_to_array(&f(&a, &b)))
        },
    );
}

fn with_scalar(
    engine: &mut Engine,
    name: &'static str,
    param: &'static str,
    f: fn(&[f64], f64) -> Vec<f64>,
) {
    engine.register_fn(
        name,
        move |_: &mut MathNamespace, a: Array, k: Dynamic| -> FnResult<Array> {
            let a = array_arg(name, "a", &a)?;
            let k = number_arg(name, param, &k)?;
            Ok(vec_to_array(&f(&a, k)))
        },
    );
}

/// `name(a)` as shorthand for `name(a, default)`.
fn with_default_scalar(
    engine: &mut Engine,
    name: &'static str,
    default: f64,
    f: fn(&[f64], f64) -> Vec<f64>,
) {
    engine.register_fn(name, move |_: &mut MathNamespace, a: Array| -> FnResult<Array> {
        Ok(vec_to_array(&f(&array_arg(name, "a", &a)?, default)))
    });
}

fn with_window(engine: &mut Engine, name: &'static str, f: fn(&[f64], usize) -> Vec<f64>) {
    engine.register_fn(
        name,
        move |_: &mut MathNamespace, a: Array, window: Dynamic| -> FnResult<Array> {
            let a = array_arg(name, "a", &a)?;
            let window = count_arg(name, "window", &window)?;
            Ok(vec_to_array(&f(&a, window)))
        },
    );
}

// ---------------------------------------------------------------------------
// The catalogue
// ---------------------------------------------------------------------------

/// Install `math`, the array `length` property and every library function.
pub(crate) fn register(engine: &mut Engine, cap: &GeneratorCap) {
    engine.register_type_with_name::<MathNamespace>("Math");
    engine.register_get("length", |a: &mut Array| a.len() as INT);

    // Arithmetic
    binary(engine, "add", arith::add);
    binary(engine, "subtract", arith::subtract);
    binary(engine, "multiply", arith::multiply);
    binary(engine, "divide", arith::divide);
    with_scalar(engine, "scale", "k", arith::scale);
    with_scalar(engine, "offset", "k", arith::offset);

    // Statistics
    reduce(engine, "sum", stats::sum);
    reduce(engine, "mean", stats::mean);
    reduce(engine, "std_dev", stats::std_dev);
    reduce(engine, "variance", stats::variance);
    reduce(engine, "min_val", stats::min);
    reduce(engine, "max_val", stats::max);
    reduce(engine, "rms", stats::rms);

    // Normalization
    unary(engine, "normalize", stats::normalize);
    unary(engine, "standardize", stats::standardize);
    engine.register_fn(
        "normalize_range",
        |_: &mut MathNamespace, a: Array, lo: Dynamic, hi: Dynamic| -> FnResult<Array> {
            const NAME: &str = "normalize_range";
            let a = array_arg(NAME, "a", &a)?;
            let lo = number_arg(NAME, "min", &lo)?;
            let hi = number_arg(NAME, "max", &hi)?;
            Ok(vec_to_array(&stats::normalize_range(&a, lo, hi)))
        },
    );

    // Filters
    with_window(engine, "moving_average", filter::moving_average);
    with_window(engine, "median_filter", filter::median_filter);
    with_scalar(engine, "lowpass_filter", "cutoff", filter::lowpass);
    with_scalar(engine, "highpass_filter", "cutoff", filter::highpass);

    // Calculus
    with_scalar(engine, "derivative", "dt", calculus::derivative);
    with_default_scalar(engine, "derivative", 1.0, calculus::derivative);
    with_scalar(engine, "integral", "dt", calculus::integral);
    with_default_scalar(engine, "integral", 1.0, calculus::integral);
    unary(engine, "cumsum", calculus::cumsum);

    // Spectral analysis
    register_spectral(engine, cap);

    // Elementwise math
    unary(engine, "abs_array", arith::abs);
    unary(engine, "sqrt_array", arith::sqrt);
    with_scalar(engine, "pow_array", "p", arith::pow);
    unary(engine, "log_array", arith::ln);
    unary(engine, "log10_array", arith::log10);
    unary(engine, "exp_array", arith::exp);
    unary(engine, "sin_array", arith::sin);
    unary(engine, "cos_array", arith::cos);
    unary(engine, "tan_array", arith::tan);

    // Generators
    register_generators(engine, cap);

    // Correlation
    let c = cap.clone();
    engine.register_fn(
        "cross_correlation",
        move |_: &mut MathNamespace, a: Array, b: Array| -> FnResult<Array> {
            const NAME: &str = "cross_correlation";
            let a = array_arg(NAME, "a", &a)?;
            let b = array_arg(NAME, "b", &b)?;
            check_len(NAME, (2 * a.len().max(b.len())).saturating_sub(1), &c)?;
            Ok(vec_to_array(&correlation::cross_correlation(&a, &b)))
        },
    );
    engine.register_fn(
        "correlation_coefficient",
        |_: &mut MathNamespace, a: Array, b: Array| -> FnResult<f64> {
            const NAME: &str = "correlation_coefficient";
            let a = array_arg(NAME, "a", &a)?;
            let b = array_arg(NAME, "b", &b)?;
            Ok(correlation::correlation_coefficient(&a, &b))
        },
    );

    // Interpolation
    let c = cap.clone();
    engine.register_fn(
        "resample",
        move |_: &mut MathNamespace, a: Array, n: Dynamic| -> FnResult<Array> {
            const NAME: &str = "resample";
            let a = array_arg(NAME, "a", &a)?;
            let n = count_arg(NAME, "n", &n)?;
            check_len(NAME, n, &c)?;
            Ok(vec_to_array(&resample::resample(&a, n)))
        },
    );
    engine.register_fn(
        "interp_linear",
        |_: &mut MathNamespace, x: Array, y: Array, x_new: Array| -> FnResult<Array> {
            const NAME: &str = "interp_linear";
            let x = array_arg(NAME, "x", &x)?;
            let y = array_arg(NAME, "y", &y)?;
            let x_new = array_arg(NAME, "x_new", &x_new)?;
            Ok(vec_to_array(&resample::interp_linear(&x, &y, &x_new)))
        },
    );

    // Time axes
    unary(engine, "ms_to_s_from_zero", time::ms_to_s_from_zero);
    unary(engine, "us_to_s_from_zero", time::us_to_s_from_zero);
    unary(engine, "ns_to_s_from_zero", time::ns_to_s_from_zero);
    with_scalar(engine, "time_from_zero", "scale", time::time_from_zero);
    with_default_scalar(engine, "time_from_zero", 1.0, time::time_from_zero);
}

fn register_spectral(engine: &mut Engine, cap: &GeneratorCap) {
    let fft_fns: [(&'static str, fn(&[f64]) -> Vec<f64>); 3] = [
        ("fft_magnitude", spectral::fft_magnitude),
        ("fft_phase", spectral::fft_phase),
        ("power_spectrum", spectral::power_spectrum),
    ];
    for (name, f) in fft_fns {
        let c = cap.clone();
        engine.register_fn(name, move |_: &mut MathNamespace, a: Array| -> FnResult<Array> {
            let a = array_arg(name, "a", &a)?;
            check_fft_len(name, a.len(), &c)?;
            Ok(vec_to_array(&f(&a)))
        });
    }

    let c = cap.clone();
    engine.register_fn(
        "fft_frequency",
        move |_: &mut MathNamespace, n: Dynamic, rate: Dynamic| -> FnResult<Array> {
            const NAME: &str = "fft_frequency";
            let n = count_arg(NAME, "n", &n)?;
            let rate = number_arg(NAME, "sample_rate", &rate)?;
            check_fft_len(NAME, n, &c)?;
            Ok(vec_to_array(&spectral::fft_frequency(n, rate)))
        },
    );
}

fn register_generators(engine: &mut Engine, cap: &GeneratorCap) {
    let c = cap.clone();
    engine.register_fn(
        "linspace",
        move |_: &mut MathNamespace, start: Dynamic, end: Dynamic, n: Dynamic| -> FnResult<Array> {
            const NAME: &str = "linspace";
            let start = number_arg(NAME, "start", &start)?;
            let end = number_arg(NAME, "end", &end)?;
            let n = count_arg(NAME, "n", &n)?;
            check_len(NAME, n, &c)?;
            Ok(vec_to_array(&generate::linspace(start, end, n)))
        },
    );

    let constant_fns: [(&'static str, fn(usize) -> Vec<f64>); 2] =
        [("zeros", generate::zeros), ("ones", generate::ones)];
    for (name, f) in constant_fns {
        let c = cap.clone();
        engine.register_fn(name, move |_: &mut MathNamespace, n: Dynamic| -> FnResult<Array> {
            let n = count_arg(name, "n", &n)?;
            check_len(name, n, &c)?;
            Ok(vec_to_array(&f(n)))
        });
    }

    fn sine(
        cap: &GeneratorCap,
        n: &Dynamic,
        freq: &Dynamic,
        amp: &Dynamic,
        phase: &Dynamic,
    ) -> FnResult<Array> {
        const NAME: &str = "sine_wave";
        let n = count_arg(NAME, "n", n)?;
        check_len(NAME, n, cap)?;
        let freq = number_arg(NAME, "freq", freq)?;
        let amp = number_arg(NAME, "amp", amp)?;
        let phase = number_arg(NAME, "phase", phase)?;
        Ok(vec_to_array(&generate::sine_wave(n, freq, amp, phase)))
    }

    let c = cap.clone();
    engine.register_fn(
        "sine_wave",
        move |_: &mut MathNamespace, n: Dynamic, freq: Dynamic| -> FnResult<Array> {
            sine(&c, &n, &freq, &Dynamic::from_float(1.0), &Dynamic::from_float(0.0))
        },
    );
    let c = cap.clone();
    engine.register_fn(
        "sine_wave",
        move |_: &mut MathNamespace, n: Dynamic, freq: Dynamic, amp: Dynamic| -> FnResult<Array> {
            sine(&c, &n, &freq, &amp, &Dynamic::from_float(0.0))
        },
    );
    let c = cap.clone();
    engine.register_fn(
        "sine_wave",
        move |_: &mut MathNamespace,
              n: Dynamic,
              freq: Dynamic,
              amp: Dynamic,
              phase: Dynamic|
              -> FnResult<Array> { sine(&c, &n, &freq, &amp, &phase) },
    );
}
