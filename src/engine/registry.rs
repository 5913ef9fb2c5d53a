//! In-memory table of open documents, keyed by the user-chosen name.

use crate::engine::outcome::{DocumentKind, ToolError};
use std::collections::BTreeMap;
use tracing::warn;

/// Document handles owned by one server instance.
///
/// Entries are never removed: a name maps to exactly one live handle for the
/// lifetime of the server. Re-creating a name replaces the previous handle.
#[derive(Debug)]
pub struct Registry<T> {
    kind: DocumentKind,
    entries: BTreeMap<String, T>,
}

impl<T> Registry<T> {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Register `doc` under `name`, returning the handle it replaced, if any.
    pub fn create(&mut self, name: &str, doc: T) -> Option<T> {
        let previous = self.entries.insert(name.to_string(), doc);
        if previous.is_some() {
            warn!(kind = %self.kind, name, "Replacing existing document with a new one");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    /// Like [`Registry::get`], but an absent name is an unknown-document error.
    pub fn require(&self, name: &str) -> Result<&T, ToolError> {
        let kind = self.kind;
        self.get(name)
            .ok_or_else(|| ToolError::unknown_document(kind, name))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut T, ToolError> {
        let kind = self.kind;
        self.entries
            .get_mut(name)
            .ok_or_else(|| ToolError::unknown_document(kind, name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, doc)| (name.as_str(), doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get() {
        let mut registry = Registry::new(DocumentKind::Workbook);
        assert!(registry.create("book", 1).is_none());
        assert_eq!(registry.get("book"), Some(&1));
        assert!(registry.contains("book"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn recreate_replaces_silently() {
        let mut registry = Registry::new(DocumentKind::Presentation);
        registry.create("deck", vec![1, 2]);
        let previous = registry.create("deck", vec![]);
        assert_eq!(previous, Some(vec![1, 2]));
        assert_eq!(registry.get("deck"), Some(&vec![]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn require_reports_unknown_document() {
        let mut registry: Registry<u8> = Registry::new(DocumentKind::Workbook);
        let err = registry.require("missing").unwrap_err();
        assert!(matches!(
            err,
            ToolError::UnknownDocument {
                kind: DocumentKind::Workbook,
                ref name
            } if name == "missing"
        ));
        assert!(registry.require_mut("missing").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn iter_is_name_ordered() {
        let mut registry = Registry::new(DocumentKind::Workbook);
        registry.create("b", ());
        registry.create("a", ());
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
