//! A `FileStore` backed by a directory on disk.
//!
//! Names map to regular files directly inside the root directory. Each call
//! is one filesystem syscall where possible (`create_new` open, `rename`,
//! `remove_file`), so a rejected call leaves the directory unchanged.
//! `write_file` stages the new content in a temp file in the same directory
//! and renames it over the target, so a failed write keeps the old content.
//! `delete_file` reads before removing: if the removal fails after the read,
//! nothing was deleted and the error is reported.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::store::{validate_name, FileStore, StoreError};

/// A flat directory of text files.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Opens `root`, creating it if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(root).map_err(|source| StoreError::Io {
            name: root.display().to_string(),
            source,
        })?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Maps an I/O error on `name` to the matching `StoreError`.
fn io_error(name: &str, source: std::io::Error) -> StoreError {
    match source.kind() {
        ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
        ErrorKind::AlreadyExists => StoreError::AlreadyExists(name.to_string()),
        _ => StoreError::Io {
            name: name.to_string(),
            source,
        },
    }
}

impl FileStore for DirStore {
    fn create_file(&mut self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| io_error(name, e))?;
        if let Err(e) = file.write_all(content.as_bytes()) {
            // Don't leave a half-written file behind.
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(io_error(name, e));
        }
        tracing::trace!("Created {}", path.display());
        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<String, StoreError> {
        let path = self.path_of(name)?;
        fs::read_to_string(&path).map_err(|e| io_error(name, e))
    }

    fn write_file(&mut self, name: &str, content: &str) -> Result<String, StoreError> {
        let previous = self.read_file(name)?;
        let path = self.path_of(name)?;
        let mut staged = NamedTempFile::new_in(&self.root).map_err(|e| io_error(name, e))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| io_error(name, e))?;
        staged.persist(&path).map_err(|e| io_error(name, e.error))?;
        tracing::trace!("Wrote {}", path.display());
        Ok(previous)
    }

    fn rename_file(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        let from_path = self.path_of(from)?;
        let to_path = self.path_of(to)?;
        if !from_path.is_file() {
            return Err(StoreError::NotFound(from.to_string()));
        }
        // fs::rename silently replaces an existing target on Unix.
        if to_path.exists() {
            return Err(StoreError::AlreadyExists(to.to_string()));
        }
        fs::rename(&from_path, &to_path).map_err(|e| io_error(from, e))?;
        tracing::trace!("Renamed {} -> {}", from_path.display(), to_path.display());
        Ok(())
    }

    fn delete_file(&mut self, name: &str) -> Result<String, StoreError> {
        let content = self.read_file(name)?;
        let path = self.path_of(name)?;
        fs::remove_file(&path).map_err(|e| io_error(name, e))?;
        tracing::trace!("Deleted {}", path.display());
        Ok(content)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_of(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let root = self.root.display().to_string();
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&root, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&root, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
