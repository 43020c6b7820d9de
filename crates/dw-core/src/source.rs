//! Migration definition sources.
//!
//! A [`DefinitionSource`] is a read-only listing of named entries plus a
//! content loader. Discovery decides which entries are migrations; the
//! source only reports what exists.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Read-only surface that migration definitions are discovered from.
pub trait DefinitionSource: Send + Sync {
    /// Names of every entry in the source, in no particular order
    fn list_entries(&self) -> CoreResult<Vec<String>>;

    /// Raw content of one entry
    fn load(&self, name: &str) -> CoreResult<String>;

    /// Human-readable location used in log lines and error messages
    fn describe(&self) -> String;
}

/// Definition source backed by the top level of one directory.
///
/// Subdirectories are skipped; every regular file is reported by file name.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DefinitionSource for DirectorySource {
    fn list_entries(&self) -> CoreResult<Vec<String>> {
        let unavailable = |message: String| CoreError::SourceUnavailable {
            location: self.dir.display().to_string(),
            message,
        };

        let entries = std::fs::read_dir(&self.dir).map_err(|e| unavailable(e.to_string()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| unavailable(e.to_string()))?;
            let file_type = entry.file_type().map_err(|e| unavailable(e.to_string()))?;
            if file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    log::debug!("Skipping non UTF-8 entry {:?} in {}", raw, self.describe());
                }
            }
        }
        Ok(names)
    }

    fn load(&self, name: &str) -> CoreResult<String> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(CoreError::DefinitionNotFound {
                name: name.to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// In-memory definition source, keyed by entry name.
///
/// Used by tests and by embedders that ship migrations inside the binary.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, String>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(name.into(), content.into());
    }

    /// Remove an entry, returning its content
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }
}

impl DefinitionSource for MemorySource {
    fn list_entries(&self) -> CoreResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn load(&self, name: &str) -> CoreResult<String> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::DefinitionNotFound {
                name: name.to_string(),
            })
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
