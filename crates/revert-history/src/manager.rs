/// Undo/redo history over reversible operations.
///
/// Applied operations live on the undo stack; undone operations move to the
/// redo stack until they are redone or new work discards them.
use crate::config::HistoryConfig;
use crate::error::{HistoryError, Outcome};
use crate::operation::Operation;

/// Owns the undo and redo stacks and sequences calls into operations.
///
/// The manager never inspects the target itself. It only decides which
/// operation to call and where the operation goes afterwards.
pub struct HistoryManager<O> {
    /// Applied operations, oldest first.
    undo_stack: Vec<O>,
    /// Undone operations, most-recently-undone on top.
    redo_stack: Vec<O>,
    /// Configuration parameters.
    config: HistoryConfig,
}

impl<O> std::fmt::Debug for HistoryManager<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_len", &self.undo_stack.len())
            .field("redo_len", &self.redo_stack.len())
            .field("max_depth", &self.config.max_depth)
            .finish()
    }
}

impl<O> Default for HistoryManager<O> {
    fn default() -> Self {
        Self::with_config(HistoryConfig::default())
    }
}

impl<O> HistoryManager<O> {
    /// Creates an empty manager with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty manager with the given config.
    pub fn with_config(mut config: HistoryConfig) -> Self {
        config.sanitize();
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Applied operations, oldest first.
    pub fn undo_stack(&self) -> &[O] {
        &self.undo_stack
    }

    /// Undone operations; the last element is the next one `redo` applies.
    pub fn redo_stack(&self) -> &[O] {
        &self.redo_stack
    }

    /// The operation the next `undo` would invert.
    pub fn peek_undo(&self) -> Option<&O> {
        self.undo_stack.last()
    }

    /// The operation the next `redo` would apply.
    pub fn peek_redo(&self) -> Option<&O> {
        self.redo_stack.last()
    }

    /// Drops both stacks. The target is not touched.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Changes the capacity, evicting immediately if the undo stack is over it.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.config.max_depth = max_depth;
        self.config.sanitize();
        self.enforce_capacity();
    }

    /// Drops the oldest undo entries beyond `max_depth`.
    fn enforce_capacity(&mut self) {
        let Some(max) = self.config.max_depth else {
            return;
        };
        if self.undo_stack.len() > max {
            let excess = self.undo_stack.len() - max;
            self.undo_stack.drain(..excess);
            tracing::debug!(evicted = excess, max_depth = max, "Evicted oldest history");
        }
    }
}

impl<O: Operation> HistoryManager<O> {
    /// Applies `op` and records it.
    ///
    /// On success the operation goes on the undo stack and the redo stack is
    /// cleared. On failure the operation is dropped and both stacks are left
    /// exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns `ApplyFailed` with the target's reason if `apply` fails.
    pub fn execute(
        &mut self,
        target: &mut O::Target,
        mut op: O,
    ) -> Result<(), HistoryError<O::Error>> {
        if let Err(e) = op.apply(target) {
            tracing::debug!(op = %op.describe(), "Apply failed: {e}");
            return Err(HistoryError::ApplyFailed(e));
        }
        tracing::trace!(op = %op.describe(), "Executed");

        self.undo_stack.push(op);
        if !self.redo_stack.is_empty() {
            tracing::trace!(discarded = self.redo_stack.len(), "Redo branch discarded");
            self.redo_stack.clear();
        }
        self.enforce_capacity();
        Ok(())
    }

    /// Inverts the most recent operation.
    ///
    /// Returns `Outcome::EmptyHistory` without touching anything when there
    /// is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns `InvertFailed` if `invert` fails. The operation is then gone
    /// from the undo stack and is not pushed to the redo stack.
    pub fn undo(&mut self, target: &mut O::Target) -> Result<Outcome, HistoryError<O::Error>> {
        let Some(mut op) = self.undo_stack.pop() else {
            return Ok(Outcome::EmptyHistory);
        };
        if let Err(e) = op.invert(target) {
            tracing::debug!(op = %op.describe(), "Invert failed: {e}");
            return Err(HistoryError::InvertFailed(e));
        }
        tracing::trace!(op = %op.describe(), "Undone");
        self.redo_stack.push(op);
        Ok(Outcome::Done)
    }

    /// Re-applies the most recently undone operation.
    ///
    /// Returns `Outcome::EmptyHistory` without touching anything when there
    /// is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns `RedoFailed` if `apply` fails. The operation is then gone from
    /// the redo stack and is not pushed back onto the undo stack.
    pub fn redo(&mut self, target: &mut O::Target) -> Result<Outcome, HistoryError<O::Error>> {
        let Some(mut op) = self.redo_stack.pop() else {
            return Ok(Outcome::EmptyHistory);
        };
        if let Err(e) = op.apply(target) {
            tracing::debug!(op = %op.describe(), "Redo failed: {e}");
            return Err(HistoryError::RedoFailed(e));
        }
        tracing::trace!(op = %op.describe(), "Redone");
        self.undo_stack.push(op);
        self.enforce_capacity();
        Ok(Outcome::Done)
    }

    /// Undoes until the undo stack is empty, returning how many were undone.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first `InvertFailed`.
    pub fn undo_all(&mut self, target: &mut O::Target) -> Result<usize, HistoryError<O::Error>> {
        let mut count = 0;
        while self.undo(target)?.is_done() {
            count += 1;
        }
        Ok(count)
    }
}
