//! Field sets and print jobs.

use std::fmt;

/// Key of a template field.
///
/// ZPL templates number their fields (`^FN1`), SVG templates name their
/// text nodes (`id="boxname"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Slot(u8),
    Name(String),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Slot(n) => write!(f, "{}", n),
            FieldKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<u8> for FieldKey {
    fn from(n: u8) -> Self {
        FieldKey::Slot(n)
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

/// One label instance's substitution values, in insertion order.
///
/// Iteration order is stable: it decides the order of `^FN` directives in
/// the ZPL output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(FieldKey, String)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<FieldKey>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<FieldKey>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: impl Into<FieldKey>) -> Option<&str> {
        let key = key.into();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An ordered batch of labels, each with a copy count.
///
/// Transient: built for one transmission and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct PrintJob {
    items: Vec<(FieldSet, u32)>,
}

impl PrintJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fields: FieldSet, copies: u32) {
        self.items.push((fields, copies));
    }

    /// Field sets in print order, each repeated `copies` times.
    pub fn labels(&self) -> impl Iterator<Item = &FieldSet> {
        self.items
            .iter()
            .flat_map(|(fields, copies)| std::iter::repeat_n(fields, *copies as usize))
    }

    /// Total number of physical labels
    pub fn label_count(&self) -> usize {
        self.items.iter().map(|(_, copies)| *copies as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.label_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut fields = FieldSet::new().with(1, "a").with(2, "b");
        fields.insert(1, "c");
        let keys: Vec<String> = fields.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert_eq!(fields.get(1), Some("c"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_slot_and_name_keys_differ() {
        let fields = FieldSet::new().with(1, "slot").with("1", "name");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(1), Some("slot"));
        assert_eq!(fields.get("1"), Some("name"));
    }

    #[test]
    fn test_print_job_expands_copies_in_order() {
        let mut job = PrintJob::new();
        job.push(FieldSet::new().with(1, "first"), 2);
        job.push(FieldSet::new().with(1, "second"), 1);
        job.push(FieldSet::new().with(1, "skipped"), 0);

        let names: Vec<&str> = job.labels().map(|f| f.get(1).unwrap()).collect();
        assert_eq!(names, vec!["first", "first", "second"]);
        assert_eq!(job.label_count(), 3);
    }
}
