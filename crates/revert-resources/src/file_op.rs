/// Reversible file operations against any `FileStore`.
use revert_history::Operation;
use serde::{Deserialize, Serialize};

use crate::store::{FileStore, StoreError};

/// One reversible edit to a `FileStore`.
///
/// `Delete` and `Write` capture the content they destroy when applied, so
/// they can be constructed with just a name and still undo correctly.
/// Inverting one that holds no capture fails with `NotCaptured` and leaves
/// the store alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOp {
    Create {
        name: String,
        content: String,
    },
    Rename {
        from: String,
        to: String,
    },
    Delete {
        name: String,
        /// Content at the time of the last apply.
        #[serde(default)]
        captured: Option<String>,
    },
    Write {
        name: String,
        content: String,
        /// Content replaced by the last apply.
        #[serde(default)]
        previous: Option<String>,
    },
}

impl FileOp {
    pub fn create(name: impl Into<String>, content: impl Into<String>) -> Self {
        FileOp::Create {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        FileOp::Rename {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        FileOp::Delete {
            name: name.into(),
            captured: None,
        }
    }

    pub fn write(name: impl Into<String>, content: impl Into<String>) -> Self {
        FileOp::Write {
            name: name.into(),
            content: content.into(),
            previous: None,
        }
    }
}

impl Operation for FileOp {
    type Target = dyn FileStore;
    type Error = StoreError;

    fn apply(&mut self, store: &mut Self::Target) -> Result<(), StoreError> {
        match self {
            FileOp::Create { name, content } => store.create_file(name, content),
            FileOp::Rename { from, to } => store.rename_file(from, to),
            FileOp::Delete { name, captured } => {
                *captured = Some(store.delete_file(name)?);
                Ok(())
            }
            FileOp::Write {
                name,
                content,
                previous,
            } => {
                *previous = Some(store.write_file(name, content)?);
                Ok(())
            }
        }
    }

    /// Inverting `Create` deletes the file whatever its content is by then.
    /// The store is only reachable through history operations, so the
    /// content can only differ if something outside the history edited it.
    fn invert(&mut self, store: &mut Self::Target) -> Result<(), StoreError> {
        match self {
            FileOp::Create { name, .. } => store.delete_file(name).map(drop),
            FileOp::Rename { from, to } => store.rename_file(to, from),
            FileOp::Delete { name, captured } => match captured {
                Some(content) => store.create_file(name, content),
                None => Err(StoreError::NotCaptured(name.clone())),
            },
            FileOp::Write { name, previous, .. } => match previous {
                Some(previous) => store.write_file(name, previous).map(drop),
                None => Err(StoreError::NotCaptured(name.clone())),
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            FileOp::Create { name, .. } => format!("create {name}"),
            FileOp::Rename { from, to } => format!("rename {from} -> {to}"),
            FileOp::Delete { name, .. } => format!("delete {name}"),
            FileOp::Write { name, .. } => format!("write {name}"),
        }
    }
}
