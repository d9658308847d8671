//! The file store capability and its in-memory implementation.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors reported by a `FileStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    #[error("file not found: {0}")]
    NotFound(String),

    /// The name is empty or is not a single path component.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// An inverse was requested for an operation that never captured the
    /// state it needs to restore.
    #[error("nothing captured to restore {0}")]
    NotCaptured(String),

    #[error("i/o error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyExists(a), Self::AlreadyExists(b))
            | (Self::NotFound(a), Self::NotFound(b))
            | (Self::InvalidName(a), Self::InvalidName(b))
            | (Self::NotCaptured(a), Self::NotCaptured(b)) => a == b,
            (Self::Io { name: a, source: x }, Self::Io { name: b, source: y }) => {
                a == b && x.kind() == y.kind()
            }
            _ => false,
        }
    }
}

/// A flat namespace of named text files.
///
/// Each method is a single mutation the store either performs completely or
/// rejects. Operations built on top rely on that to stay invertible.
pub trait FileStore {
    /// Creates `name` with `content`. Fails if it already exists.
    fn create_file(&mut self, name: &str, content: &str) -> Result<(), StoreError>;

    /// Returns the content of `name`.
    fn read_file(&self, name: &str) -> Result<String, StoreError>;

    /// Replaces the content of an existing file, returning the previous content.
    fn write_file(&mut self, name: &str, content: &str) -> Result<String, StoreError>;

    /// Renames `from` to `to`. Fails if `from` is missing or `to` exists.
    fn rename_file(&mut self, from: &str, to: &str) -> Result<(), StoreError>;

    /// Deletes `name`, returning its content.
    fn delete_file(&mut self, name: &str) -> Result<String, StoreError>;

    fn exists(&self, name: &str) -> bool;

    /// All file names, sorted.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Rejects names that are empty or that would escape a flat namespace.
pub(crate) fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// An in-memory `FileStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    files: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStore for MemoryStore {
    fn create_file(&mut self, name: &str, content: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        if self.files.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        self.files.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<String, StoreError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn write_file(&mut self, name: &str, content: &str) -> Result<String, StoreError> {
        let slot = self
            .files
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(std::mem::replace(slot, content.to_string()))
    }

    fn rename_file(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        validate_name(to)?;
        if !self.files.contains_key(from) {
            return Err(StoreError::NotFound(from.to_string()));
        }
        if self.files.contains_key(to) {
            return Err(StoreError::AlreadyExists(to.to_string()));
        }
        if let Some(content) = self.files.remove(from) {
            self.files.insert(to.to_string(), content);
        }
        Ok(())
    }

    fn delete_file(&mut self, name: &str) -> Result<String, StoreError> {
        self.files
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.files.keys().cloned().collect())
    }
}
