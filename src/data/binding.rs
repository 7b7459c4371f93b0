use std::collections::BTreeMap;

use super::model::{BoundColumn, SourceDataSet};
use super::store::DerivedColumnStore;

// ---------------------------------------------------------------------------
// DataBinding – owns the source half of the name-resolution table
// ---------------------------------------------------------------------------

/// Holds the current source columns and produces evaluation environments
/// that merge them with the derived-column store.
#[derive(Debug, Clone, Default)]
pub struct DataBinding {
    source: SourceDataSet,
}

impl DataBinding {
    pub fn new(source: SourceDataSet) -> Self {
        Self { source }
    }

    /// Replace the source half wholesale.
    ///
    /// Returns the names of derived columns in `store` that are now shadowed
    /// by a source column of the same name.
    pub fn bind(&mut self, source: SourceDataSet, store: &DerivedColumnStore) -> Vec<String> {
        self.source = source;
        store
            .names()
            .filter(|name| self.source.contains(name))
            .map(str::to_string)
            .collect()
    }

    pub fn source(&self) -> &SourceDataSet {
        &self.source
    }

    pub fn is_source_column(&self, name: &str) -> bool {
        self.source.contains(name)
    }

    /// Build the environment for one evaluation from the current state of
    /// `store`.
    pub fn environment<'a>(&'a self, store: &'a DerivedColumnStore) -> Environment<'a> {
        let mut columns = BTreeMap::new();
        for derived in store.list() {
            columns.insert(derived.name.as_str(), BoundColumn::Derived(derived));
        }
        // Source columns are authoritative for a shared name.
        for source in self.source.iter() {
            columns.insert(source.name.as_str(), BoundColumn::Source(source));
        }
        Environment { columns }
    }
}

// ---------------------------------------------------------------------------
// Environment – a read-only snapshot handed to the evaluator
// ---------------------------------------------------------------------------

/// Name → column lookup table for a single script run.
#[derive(Debug, Clone)]
pub struct Environment<'a> {
    columns: BTreeMap<&'a str, BoundColumn<'a>>,
}

impl<'a> Environment<'a> {
    pub fn get(&self, name: &str) -> Option<BoundColumn<'a>> {
        self.columns.get(name).copied()
    }

    /// Columns sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = BoundColumn<'a>> + '_ {
        self.columns.values().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
