//! Trait definitions for document persistence services.

use crate::format::document::Document;
use crate::format::error::PersistenceError;

/// Persistence service for annotation documents.
///
/// Documents are identified by the base name of the image they describe.
/// Saving is an idempotent upsert ("last writer wins"); there is no merging
/// or conflict detection.
pub trait DocumentStore {
    /// Human-readable name for logs.
    fn display_name(&self) -> &'static str;

    /// Insert or replace the document stored under `base_name`.
    fn save(&mut self, base_name: &str, document: &Document) -> Result<(), PersistenceError>;

    /// Fetch a previously saved document, or `None` if there is none.
    fn fetch(&self, base_name: &str) -> Result<Option<Document>, PersistenceError>;

    /// Base names of all saved documents.
    fn list_all(&self) -> Result<Vec<String>, PersistenceError>;
}

/// Reject names that would escape the storage namespace.
pub(crate) fn validate_name(base_name: &str) -> Result<(), PersistenceError> {
    let bad = base_name.is_empty()
        || base_name == "."
        || base_name == ".."
        || base_name.contains(['/', '\\', '\0']);
    if bad {
        return Err(PersistenceError::InvalidName {
            name: base_name.to_string(),
        });
    }
    Ok(())
}
