/// Reversible edits to a `TextBuffer`.
///
/// Positions are char indices. Each inverse checks that the buffer still
/// holds the text it is about to remove and fails with `Mismatch` otherwise,
/// leaving the buffer untouched. A `Remove` that never captured its text
/// fails with `NotCaptured`.
use std::ops::Range;

use revert_history::Operation;
use serde::{Deserialize, Serialize};

use crate::buffer::{TextBuffer, TextError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextOp {
    /// Inserts `text` at char index `at`.
    Insert { at: usize, text: String },
    /// Appends `text` at the end of the buffer.
    Append {
        text: String,
        /// Where the text started on the last apply.
        #[serde(default)]
        start: Option<usize>,
    },
    /// Removes a char range.
    Remove {
        range: Range<usize>,
        /// Text removed by the last apply.
        #[serde(default)]
        removed: Option<String>,
    },
}

impl TextOp {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        TextOp::Insert {
            at,
            text: text.into(),
        }
    }

    pub fn append(text: impl Into<String>) -> Self {
        TextOp::Append {
            text: text.into(),
            start: None,
        }
    }

    pub fn remove(range: Range<usize>) -> Self {
        TextOp::Remove {
            range,
            removed: None,
        }
    }
}

/// Removes `expected` from `at`, provided the buffer still holds it there.
fn take_back(buf: &mut TextBuffer, at: usize, expected: &str) -> Result<(), TextError> {
    let range = at..at + expected.chars().count();
    let found = buf.slice(range.clone())?;
    if found != expected {
        return Err(TextError::Mismatch {
            at,
            expected: expected.to_string(),
            found,
        });
    }
    buf.remove(range)?;
    Ok(())
}

impl Operation for TextOp {
    type Target = TextBuffer;
    type Error = TextError;

    fn apply(&mut self, buf: &mut TextBuffer) -> Result<(), TextError> {
        match self {
            TextOp::Insert { at, text } => buf.insert(*at, text),
            TextOp::Append { text, start } => {
                *start = Some(buf.len_chars());
                buf.append(text);
                Ok(())
            }
            TextOp::Remove { range, removed } => {
                *removed = Some(buf.remove(range.clone())?);
                Ok(())
            }
        }
    }

    fn invert(&mut self, buf: &mut TextBuffer) -> Result<(), TextError> {
        match self {
            TextOp::Insert { at, text } => take_back(buf, *at, text),
            TextOp::Append { text, start } => {
                let at = match start {
                    Some(at) => *at,
                    None => buf.len_chars().saturating_sub(text.chars().count()),
                };
                take_back(buf, at, text)
            }
            TextOp::Remove { range, removed } => match removed {
                Some(text) => buf.insert(range.start, text),
                None => Err(TextError::NotCaptured {
                    start: range.start,
                    end: range.end,
                }),
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            TextOp::Insert { at, text } => format!("insert {text:?} at {at}"),
            TextOp::Append { text, .. } => format!("append {text:?}"),
            TextOp::Remove { range, .. } => format!("remove {}..{}", range.start, range.end),
        }
    }
}
