//! In-process document store.

use std::collections::BTreeMap;

use crate::format::document::Document;
use crate::format::error::PersistenceError;
use crate::format::traits::{DocumentStore, validate_name};

/// Keeps documents in memory, keyed by base name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, Document>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Insert a document without counting it as a save, e.g. to simulate a
    /// result produced by another process.
    pub fn insert(&mut self, base_name: impl Into<String>, document: Document) {
        self.documents.insert(base_name.into(), document);
    }
}

impl DocumentStore for MemoryStore {
    fn display_name(&self) -> &'static str {
        "memory"
    }

    fn save(&mut self, base_name: &str, document: &Document) -> Result<(), PersistenceError> {
        validate_name(base_name)?;
        self.documents.insert(base_name.to_string(), document.clone());
        self.saves += 1;
        Ok(())
    }

    fn fetch(&self, base_name: &str) -> Result<Option<Document>, PersistenceError> {
        validate_name(base_name)?;
        Ok(self.documents.get(base_name).cloned())
    }

    fn list_all(&self) -> Result<Vec<String>, PersistenceError> {
        Ok(self.documents.keys().cloned().collect())
    }
}
