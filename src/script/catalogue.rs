//! The fixed list of functions reachable as `math.<name>(…)`.
//!
//! Saved scripts refer to these by name forever: entries may be added, but
//! an existing name's parameters must never change.

/// One documented library function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: &'static str,
    /// Parameter list as written in scripts; `[x]` marks an optional one.
    pub params: &'static str,
    pub summary: &'static str,
    /// A complete script exercising the function and returning an array.
    pub example: &'static str,
}

/// A titled group of functions.
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub title: &'static str,
    pub functions: &'static [FunctionSpec],
}

macro_rules! entry {
    ($name:literal, $params:literal, $summary:literal, $example:literal) => {
        FunctionSpec {
            name: $name,
            params: $params,
            summary: $summary,
            example: $example,
        }
    };
}

pub const CATALOGUE: &[Category] = &[
    Category {
        title: "Arithmetic",
        functions: &[
            entry!("add", "a, b", "elementwise a + b (shorter length)", "math.add([1, 2], [3, 4])"),
            entry!("subtract", "a, b", "elementwise a - b", "math.subtract([5, 5], [1, 2])"),
            entry!("multiply", "a, b", "elementwise a * b", "math.multiply([1, 2], [3, 4])"),
            entry!("divide", "a, b", "elementwise a / b, 0 where b is 0", "math.divide([1, 2], [0, 4])"),
            entry!("scale", "a, k", "a * k", "math.scale([1, 2], 2.5)"),
            entry!("offset", "a, k", "a + k", "math.offset([1, 2], -1)"),
        ],
    },
    Category {
        title: "Statistics",
        functions: &[
            entry!("sum", "a", "sum of all elements", "[math.sum([1, 2, 3])]"),
            entry!("mean", "a", "arithmetic mean", "[math.mean([1, 2, 3])]"),
            entry!("std_dev", "a", "sample standard deviation", "[math.std_dev([1, 2, 3])]"),
            entry!("variance", "a", "sample variance (n - 1)", "[math.variance([1, 2, 3])]"),
            entry!("min_val", "a", "smallest element", "[math.min_val([4, 2, 3])]"),
            entry!("max_val", "a", "largest element", "[math.max_val([4, 2, 3])]"),
            entry!("rms", "a", "root mean square", "[math.rms([1, -1])]"),
        ],
    },
    Category {
        title: "Normalization",
        functions: &[
            entry!("normalize", "a", "min-max to [0, 1]; constant input gives 0.5", "math.normalize([10, 20, 30])"),
            entry!("standardize", "a", "z-score; zero deviation gives 0", "math.standardize([1, 2, 3])"),
            entry!("normalize_range", "a, min, max", "min-max to [min, max]", "math.normalize_range([1, 2, 3], -1, 1)"),
        ],
    },
    Category {
        title: "Filters",
        functions: &[
            entry!("moving_average", "a, window", "centered moving average", "math.moving_average([1, 2, 3, 4], 3)"),
            entry!("median_filter", "a, window", "centered running median", "math.median_filter([1, 9, 1, 1], 3)"),
            entry!("lowpass_filter", "a, cutoff", "single-pole low pass, cutoff in [0, 1]", "math.lowpass_filter([0, 1, 1, 1], 0.3)"),
            entry!("highpass_filter", "a, cutoff", "a - lowpass_filter(a, cutoff)", "math.highpass_filter([0, 1, 1, 1], 0.3)"),
        ],
    },
    Category {
        title: "Calculus",
        functions: &[
            entry!("derivative", "a, [dt = 1]", "central-difference derivative", "math.derivative([0, 1, 4, 9], 0.5)"),
            entry!("integral", "a, [dt = 1]", "cumulative trapezoidal integral", "math.integral([1, 1, 1])"),
            entry!("cumsum", "a", "running total", "math.cumsum([1, 2, 3])"),
        ],
    },
    Category {
        title: "Spectral analysis",
        functions: &[
            entry!("fft_magnitude", "a", "single-sided amplitude spectrum (n/2 + 1 bins)", "math.fft_magnitude(math.sine_wave(64, 4))"),
            entry!("fft_phase", "a", "phase of each bin in radians", "math.fft_phase(math.sine_wave(64, 4))"),
            entry!("fft_frequency", "n, sample_rate", "frequency axis for an n-sample FFT", "math.fft_frequency(64, 1000)"),
            entry!("power_spectrum", "a", "fft_magnitude squared", "math.power_spectrum([1, 0, -1, 0])"),
        ],
    },
    Category {
        title: "Elementwise math",
        functions: &[
            entry!("abs_array", "a", "absolute value", "math.abs_array([-1, 2])"),
            entry!("sqrt_array", "a", "square root, negatives clamp to 0", "math.sqrt_array([4, -4])"),
            entry!("pow_array", "a, p", "a raised to p", "math.pow_array([2, 3], 2)"),
            entry!("log_array", "a", "natural log, non-positive gives 0", "math.log_array([1, 0])"),
            entry!("log10_array", "a", "base-10 log, non-positive gives 0", "math.log10_array([100, -1])"),
            entry!("exp_array", "a", "e raised to a", "math.exp_array([0, 1])"),
            entry!("sin_array", "a", "sine", "math.sin_array([0, 1.5708])"),
            entry!("cos_array", "a", "cosine", "math.cos_array([0, 3.1416])"),
            entry!("tan_array", "a", "tangent", "math.tan_array([0, 0.7854])"),
        ],
    },
    Category {
        title: "Generators",
        functions: &[
            entry!("linspace", "start, end, n", "n evenly spaced values, inclusive", "math.linspace(0, 1, 5)"),
            entry!("zeros", "n", "n zeros", "math.zeros(3)"),
            entry!("ones", "n", "n ones", "math.ones(3)"),
            entry!("sine_wave", "n, freq, [amp = 1], [phase = 0]", "amp * sin(2π * freq * i / n + phase)", "math.sine_wave(8, 1, 2, 0)"),
        ],
    },
    Category {
        title: "Correlation",
        functions: &[
            entry!("cross_correlation", "a, b", "mean product per lag, 2n - 1 lags", "math.cross_correlation([1, 2], [3, 4])"),
            entry!("correlation_coefficient", "a, b", "Pearson r", "[math.correlation_coefficient([1, 2, 3], [2, 4, 7])]"),
        ],
    },
    Category {
        title: "Interpolation",
        functions: &[
            entry!("resample", "a, n", "linear resample to n points", "math.resample([0, 10], 5)"),
            entry!("interp_linear", "x, y, x_new", "piecewise-linear y(x_new), clamped at the ends", "math.interp_linear([0, 1], [0, 10], [0.5, 2])"),
        ],
    },
    Category {
        title: "Time axes",
        functions: &[
            entry!("ms_to_s_from_zero", "a", "milliseconds to seconds from the first sample", "math.ms_to_s_from_zero([1000, 1500])"),
            entry!("us_to_s_from_zero", "a", "microseconds to seconds from the first sample", "math.us_to_s_from_zero([0, 1000000])"),
            entry!("ns_to_s_from_zero", "a", "nanoseconds to seconds from the first sample", "math.ns_to_s_from_zero([0, 1000000000])"),
            entry!("time_from_zero", "a, [scale = 1]", "(a - a[0]) * scale", "math.time_from_zero([5, 7], 0.5)"),
        ],
    },
];

/// Every catalogue entry, in help-document order.
pub fn functions() -> impl Iterator<Item = &'static FunctionSpec> {
    CATALOGUE.iter().flat_map(|c| c.functions.iter())
}

pub fn lookup(name: &str) -> Option<&'static FunctionSpec> {
    functions().find(|f| f.name == name)
}

/// Reference text shown to script authors.
pub fn help_document() -> String {
    let mut out = String::from(
        "Column scripts\n\
         ==============\n\
         \n\
         Columns:   data.Temperature, data[\"Motor Speed\"]  (arrays of numbers)\n\
         Functions: math.<name>(...)\n\
         Result:    `return <array>;` or a final array expression\n",
    );
    for category in CATALOGUE {
        out.push_str(&format!("\n{}\n", category.title));
        for f in category.functions {
            let call = format!("math.{}({})", f.name, f.params);
            out.push_str(&format!("  {call:<48} {}\n", f.summary));
        }
    }
    out.push_str(
        "\nExamples\n\
         \n\
         // sum of two columns\n\
         return math.add(data.Temperature, data.Pressure);\n\
         \n\
         // smooth, then differentiate\n\
         let filtered = math.lowpass_filter(data.Voltage, 0.1);\n\
         return math.derivative(filtered, 0.01);\n\
         \n\
         // constant column holding a correlation coefficient\n\
         let r = math.correlation_coefficient(data.Temperature, data.Humidity);\n\
         return math.scale(math.ones(data.Temperature.length), r);\n\
         \n\
         // millisecond timestamps to seconds from zero\n\
         return math.ms_to_s_from_zero(data.Timestamp);\n",
    );
    out
}
