/// Text buffer wrapping `ropey::Rope`, the target of `TextOp`.
use std::fmt;
use std::ops::Range;

use ropey::Rope;
use thiserror::Error;

/// Errors reported by `TextBuffer` edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("position {pos} out of bounds (buffer has {len} chars)")]
    OutOfBounds { pos: usize, len: usize },

    #[error("invalid range: start ({start}) > end ({end})")]
    InvalidRange { start: usize, end: usize },

    /// An inverse was requested before the operation captured any text.
    #[error("no removed text captured for range {start}..{end}")]
    NotCaptured { start: usize, end: usize },

    /// The buffer no longer holds the text an operation expects to remove.
    #[error("expected {expected:?} at {at}, found {found:?}")]
    Mismatch {
        at: usize,
        expected: String,
        found: String,
    },
}

/// A text buffer backed by a rope data structure for efficient editing.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for TextBuffer {}

impl TextBuffer {
    /// Creates an empty text buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines in the buffer.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<(), TextError> {
        self.check_pos(char_idx)?;
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Appends text at the end of the buffer.
    pub fn append(&mut self, text: &str) {
        let end = self.rope.len_chars();
        self.rope.insert(end, text);
    }

    /// Removes the char range and returns the removed text.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or out of bounds.
    pub fn remove(&mut self, range: Range<usize>) -> Result<String, TextError> {
        let removed = self.slice(range.clone())?;
        self.rope.remove(range);
        Ok(removed)
    }

    /// Returns the text in the given char range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Result<String, TextError> {
        if range.start > range.end {
            return Err(TextError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        self.check_pos(range.end)?;
        Ok(self.rope.slice(range).to_string())
    }

    fn check_pos(&self, pos: usize) -> Result<(), TextError> {
        let len = self.rope.len_chars();
        if pos > len {
            return Err(TextError::OutOfBounds { pos, len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.len_lines(), 1); // ropey always has at least 1 line
    }

    #[test]
    fn test_insert_and_remove() {
        let mut buf = TextBuffer::new();
        buf.insert(0, "hello").unwrap();
        buf.insert(5, " world").unwrap();
        assert_eq!(buf.to_string(), "hello world");

        assert_eq!(buf.remove(5..11).unwrap(), " world");
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn test_append() {
        let mut buf = TextBuffer::from("Olá");
        buf.append(", mundo");
        assert_eq!(buf.to_string(), "Olá, mundo");
        assert_eq!(buf.len_chars(), 10);
    }

    #[test]
    fn test_char_indices_not_bytes() {
        let mut buf = TextBuffer::from("héllo");
        assert_eq!(buf.remove(1..2).unwrap(), "é");
        assert_eq!(buf.to_string(), "hllo");
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = TextBuffer::from("hello");
        assert_eq!(
            buf.insert(6, "x"),
            Err(TextError::OutOfBounds { pos: 6, len: 5 })
        );
        assert_eq!(
            buf.remove(3..9),
            Err(TextError::OutOfBounds { pos: 9, len: 5 })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = 4..2;
        assert_eq!(
            buf.slice(inverted),
            Err(TextError::InvalidRange { start: 4, end: 2 })
        );
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn test_equality_ignores_chunking() {
        let mut a = TextBuffer::new();
        a.append("ab");
        a.append("cd");
        assert_eq!(a, TextBuffer::from("abcd"));
    }
}
