use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NamedArray – one numeric column
// ---------------------------------------------------------------------------

/// A named sequence of samples, as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArray {
    pub name: String,
    pub values: Vec<f64>,
}

impl NamedArray {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SourceDataSet – the loaded numeric columns
// ---------------------------------------------------------------------------

/// All numeric columns of the currently loaded file.
///
/// Column order follows ingestion order; names are unique; inserting a
/// column whose name already exists replaces it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDataSet {
    columns: Vec<NamedArray>,
    index: BTreeMap<String, usize>,
}

impl SourceDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from `(name, values)` pairs. Later duplicates win.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, values) in columns {
            set.insert(NamedArray::new(name, values));
        }
        set
    }

    pub fn insert(&mut self, column: NamedArray) {
        match self.index.get(&column.name) {
            Some(&i) => self.columns[i] = column,
            None => {
                self.index.insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamedArray> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedArray> {
        self.columns.iter()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(NamedArray::len).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// DerivedColumn – the output of one successful script run
// ---------------------------------------------------------------------------

/// A column produced by a script, carrying the script for replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedColumn {
    pub name: String,
    pub data: Vec<f64>,
    pub source_script: String,
}

impl DerivedColumn {
    pub fn new(name: impl Into<String>, data: Vec<f64>, source_script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data,
            source_script: source_script.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// BoundColumn – one entry of the evaluation environment
// ---------------------------------------------------------------------------

/// A column visible to scripts, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundColumn<'a> {
    Source(&'a NamedArray),
    Derived(&'a DerivedColumn),
}

impl<'a> BoundColumn<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            BoundColumn::Source(c) => &c.name,
            BoundColumn::Derived(c) => &c.name,
        }
    }

    pub fn values(&self) -> &'a [f64] {
        match self {
            BoundColumn::Source(c) => &c.values,
            BoundColumn::Derived(c) => &c.data,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, BoundColumn::Derived(_))
    }
}

impl fmt::Display for BoundColumn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_derived() { "derived" } else { "source" };
        write!(f, "{} ({kind}, {} samples)", self.name(), self.values().len())
    }
}
