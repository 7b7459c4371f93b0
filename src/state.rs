use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;
use crate::data::loader;
use crate::data::model::BoundColumn;
use crate::error::ScriptError;
use crate::preset::PresetScheme;
use crate::script::{ReplayReport, ScriptEngine};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything a front end needs between user actions, independent of how
/// it is presented.
pub struct Session {
    pub engine: ScriptEngine,

    /// File the current source columns were loaded from.
    pub source_path: Option<PathBuf>,

    /// Outcome of the last action, for display.
    pub status_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: ScriptEngine::with_limits(config.limits.clone()),
            source_path: None,
            status_message: None,
        }
    }

    /// Load a data file and rebind it. Derived columns are kept.
    pub fn load_source(&mut self, path: &Path) -> Result<()> {
        let dataset = loader::load_file(path)?;
        let columns = dataset.len();
        let shadowed = self.engine.set_source_data(dataset);

        self.source_path = Some(path.to_path_buf());
        self.status_message = Some(if shadowed.is_empty() {
            format!("Loaded {columns} columns from {}", path.display())
        } else {
            format!(
                "Loaded {columns} columns from {}; hidden derived columns: {}",
                path.display(),
                shadowed.join(", ")
            )
        });
        Ok(())
    }

    /// Run one script and keep the result as `output_name`.
    pub fn run_script(&mut self, script: &str, output_name: &str) -> Result<(), ScriptError> {
        match self.engine.execute(script, output_name) {
            Ok(column) => {
                self.status_message = Some(format!("Computed {}", BoundColumn::Derived(column)));
                Ok(())
            }
            Err(e) => {
                self.status_message = Some(format!("{}: {e}", output_name.trim()));
                Err(e)
            }
        }
    }

    /// Replace all derived columns with those of `scheme`, replayed against
    /// the current source data.
    pub fn apply_scheme(&mut self, scheme: &PresetScheme) -> ReplayReport {
        let source = self.engine.source_data().clone();
        let report = scheme.apply(&mut self.engine, source);
        self.status_message = Some(format!(
            "Scheme \"{}\": {}/{} scripts succeeded",
            scheme.name,
            report.succeeded,
            report.total()
        ));
        report
    }

    pub fn capture_scheme(&self, name: &str) -> PresetScheme {
        PresetScheme::capture(name, &self.engine)
    }
}
