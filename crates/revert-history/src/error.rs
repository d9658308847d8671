//! Results reported by the history manager.

use thiserror::Error;

/// Non-error result of `undo` and `redo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// An operation was moved from one stack to the other.
    Done,
    /// The stack was empty; nothing changed.
    EmptyHistory,
}

impl Outcome {
    /// Whether an operation was actually inverted or re-applied.
    pub fn is_done(self) -> bool {
        matches!(self, Outcome::Done)
    }
}

/// Failures surfaced by `execute`, `undo` and `redo`.
///
/// `E` is the resource's own failure type, carried unchanged so the caller
/// can inspect the reason.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError<E> {
    /// The forward mutation was rejected by `execute`. History is unchanged.
    #[error("apply failed: {0}")]
    ApplyFailed(E),

    /// The inverse mutation was rejected during `undo`.
    ///
    /// The operation has left the undo stack and was not pushed to the redo
    /// stack. The resource may be partially inverted and needs manual
    /// reconciliation.
    #[error("invert failed: {0}")]
    InvertFailed(E),

    /// The forward mutation was rejected during `redo`.
    ///
    /// The operation has left the redo stack and was not pushed back onto
    /// the undo stack.
    #[error("redo failed: {0}")]
    RedoFailed(E),

    /// A shared session's lock was poisoned by a panicking holder.
    #[error("history lock poisoned")]
    Poisoned,
}

impl<E> HistoryError<E> {
    /// The resource failure, if this error carries one.
    pub fn reason(&self) -> Option<&E> {
        match self {
            HistoryError::ApplyFailed(e)
            | HistoryError::InvertFailed(e)
            | HistoryError::RedoFailed(e) => Some(e),
            HistoryError::Poisoned => None,
        }
    }

    /// Whether the resource may now be out of step with the history.
    ///
    /// Only a failed undo qualifies. A failed redo leaves the resource in the
    /// undone state the history already describes.
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, HistoryError::InvertFailed(_))
    }
}
