//! File-backed document store: one pretty-printed `<base>.json` per image.

use std::path::{Path, PathBuf};

use crate::format::document::Document;
use crate::format::error::PersistenceError;
use crate::format::traits::{DocumentStore, validate_name};

/// Stores documents as JSON files in a single directory.
#[derive(Debug, Clone)]
pub struct JsonDirectory {
    dir: PathBuf,
}

impl JsonDirectory {
    /// Use `dir`, which must already exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(PersistenceError::DirectoryUnavailable { path: dir });
        }
        Ok(Self { dir })
    }

    /// Use `dir`, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `base_name`.
    pub fn path_for(&self, base_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", base_name))
    }
}

impl DocumentStore for JsonDirectory {
    fn display_name(&self) -> &'static str {
        "json directory"
    }

    fn save(&mut self, base_name: &str, document: &Document) -> Result<(), PersistenceError> {
        validate_name(base_name)?;
        let path = self.path_for(base_name);
        let json = document.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved {} instance(s) to {:?}", document.instance_count(), path);
        Ok(())
    }

    fn fetch(&self, base_name: &str) -> Result<Option<Document>, PersistenceError> {
        validate_name(base_name)?;
        let path = self.path_for(base_name);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No saved document at {:?}", path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let document = Document::from_json(&json)?;
        log::info!("Loaded document from {:?}", path);
        Ok(Some(document))
    }

    fn list_all(&self) -> Result<Vec<String>, PersistenceError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
