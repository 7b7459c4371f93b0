use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::SourceDataSet;
use crate::script::{ReplayReport, ScriptEngine};

// ---------------------------------------------------------------------------
// ScriptPreset / PresetScheme – the persisted form of derived columns
// ---------------------------------------------------------------------------

/// One saved script and the column it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPreset {
    pub output_name: String,
    pub script: String,
}

impl ScriptPreset {
    pub fn new(output_name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            script: script.into(),
        }
    }
}

/// A named set of scripts, replayed in order, plus the plot layouts that go
/// with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetScheme {
    pub name: String,
    #[serde(default)]
    pub scripts: Vec<ScriptPreset>,
    /// Canvas layouts. Not interpreted here, only carried through.
    #[serde(default)]
    pub canvases: Vec<serde_json::Value>,
}

impl PresetScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scripts: Vec::new(),
            canvases: Vec::new(),
        }
    }

    /// Snapshot the engine's derived columns in store order.
    pub fn capture(name: impl Into<String>, engine: &ScriptEngine) -> Self {
        Self {
            name: name.into(),
            scripts: engine
                .derived_columns()
                .iter()
                .map(|c| ScriptPreset::new(c.name.clone(), c.source_script.clone()))
                .collect(),
            canvases: Vec::new(),
        }
    }

    /// Drop every derived column, bind `source` and replay the scripts.
    pub fn apply(&self, engine: &mut ScriptEngine, source: SourceDataSet) -> ReplayReport {
        log::info!("applying scheme \"{}\" ({} scripts)", self.name, self.scripts.len());
        engine.clear_derived_columns();
        engine.set_source_data(source);
        engine.replay(&self.scripts)
    }
}

// ---------------------------------------------------------------------------
// PresetLibrary – the schemes file
// ---------------------------------------------------------------------------

/// All schemes stored in one JSON file (a top-level array).
///
/// Edits are in memory until [`PresetLibrary::save`].
#[derive(Debug, Clone)]
pub struct PresetLibrary {
    path: PathBuf,
    schemes: Vec<PresetScheme>,
}

impl PresetLibrary {
    /// An empty library that will be written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schemes: Vec::new(),
        }
    }

    /// Read the library at `path`. A missing file is an empty library.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            log::info!("no preset file at {}, starting empty", path.display());
            return Ok(Self::new(path));
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading presets {}", path.display()))?;
        let schemes: Vec<PresetScheme> = serde_json::from_str(&text)
            .with_context(|| format!("parsing presets {}", path.display()))?;
        log::info!("loaded {} schemes from {}", schemes.len(), path.display());
        Ok(Self { path, schemes })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(&self.schemes).context("serializing presets")?;
        fs::write(&self.path, text)
            .with_context(|| format!("writing presets {}", self.path.display()))?;
        log::info!("saved {} schemes to {}", self.schemes.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scheme_names(&self) -> Vec<&str> {
        self.schemes.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&PresetScheme> {
        self.schemes.iter().find(|s| s.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert, or replace the scheme of the same name in place.
    pub fn save_scheme(&mut self, scheme: PresetScheme) {
        match self.schemes.iter_mut().find(|s| s.name == scheme.name) {
            Some(existing) => *existing = scheme,
            None => self.schemes.push(scheme),
        }
    }

    pub fn delete_scheme(&mut self, name: &str) -> bool {
        let before = self.schemes.len();
        self.schemes.retain(|s| s.name != name);
        self.schemes.len() != before
    }

    /// Fails when `old` is missing or `new` is already taken.
    pub fn rename_scheme(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.has(new) {
            return false;
        }
        match self.schemes.iter_mut().find(|s| s.name == old) {
            Some(scheme) => {
                scheme.name = new.to_string();
                true
            }
            None => false,
        }
    }
}
