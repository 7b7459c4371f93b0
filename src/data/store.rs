use super::model::DerivedColumn;

// ---------------------------------------------------------------------------
// DerivedColumnStore – ordered, name-keyed table of script outputs
// ---------------------------------------------------------------------------

/// Derived columns in creation order. No two entries share a name.
///
/// Replacing an entry keeps its position so that a re-run script does not
/// move its column around in listings.
#[derive(Debug, Clone, Default)]
pub struct DerivedColumnStore {
    entries: Vec<DerivedColumn>,
}

impl DerivedColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry or replace the one with the same name wholesale.
    pub fn upsert(&mut self, column: DerivedColumn) -> &DerivedColumn {
        let i = match self.position(&column.name) {
            Some(i) => {
                self.entries[i] = column;
                i
            }
            None => {
                self.entries.push(column);
                self.entries.len() - 1
            }
        };
        &self.entries[i]
    }

    /// Remove by name. Returns `false` when there was nothing to remove.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Data of the named entry.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.entry(name).map(|c| c.data.as_slice())
    }

    pub fn entry(&self, name: &str) -> Option<&DerivedColumn> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// All entries in display order.
    pub fn list(&self) -> &[DerivedColumn] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data: &[f64]) -> DerivedColumn {
        DerivedColumn::new(name, data.to_vec(), format!("return {data:?};"))
    }

    #[test]
    fn upsert_replaces_without_moving() {
        let mut store = DerivedColumnStore::new();
        store.upsert(column("a", &[1.0]));
        store.upsert(column("b", &[2.0]));
        let replaced = store.upsert(column("a", &[3.0, 4.0]));
        assert_eq!(replaced.data, vec![3.0, 4.0]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.get("a"), Some(&[3.0, 4.0][..]));
        assert_eq!(store.entry("a").unwrap().source_script, "return [3.0, 4.0];");
    }

    #[test]
    fn remove_missing_is_a_no_op() {
        let mut store = DerivedColumnStore::new();
        store.upsert(column("a", &[1.0]));

        assert!(!store.remove("nope"));
        assert_eq!(store.len(), 1);
        assert!(store.remove("a"));
        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut store = DerivedColumnStore::new();
        store.upsert(column("a", &[1.0]));
        store.upsert(column("b", &[1.0]));
        store.clear();
        assert!(store.list().is_empty());
    }
}
