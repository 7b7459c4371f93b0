use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ScriptLimits – the execution budget of one script run
// ---------------------------------------------------------------------------

/// Resource limits applied to every script evaluation.
///
/// `0` disables `max_operations`; every other limit is always enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptLimits {
    /// Interpreter operations before the run is aborted.
    pub max_operations: u64,
    pub max_call_levels: usize,
    pub max_expr_depth: usize,
    pub max_string_size: usize,
    /// Longest array a script may build, through generators (`zeros`,
    /// `linspace`, `resample`, FFT padding, …) or array built-ins such as
    /// `pad`.
    pub max_generated_len: usize,
    /// Wall-clock limit for one run.
    pub timeout_ms: Option<u64>,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: 5_000_000,
            max_call_levels: 64,
            max_expr_depth: 64,
            max_string_size: 65_536,
            max_generated_len: 1 << 24,
            timeout_ms: None,
        }
    }
}

impl ScriptLimits {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// Config – optional JSON settings file
// ---------------------------------------------------------------------------

/// Settings for the command-line front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: ScriptLimits,
    /// Preset library used when `--presets` is not given.
    pub presets_path: Option<PathBuf>,
}

impl Config {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// [`Config::load`] when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
