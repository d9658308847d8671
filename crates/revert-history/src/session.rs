/// A resource bundled with its history.
///
/// `Session` is the explicitly constructed owner of one target and the
/// manager that edits it. `SharedSession` puts a session behind a single
/// mutex so every `execute`/`undo`/`redo` runs inside one critical section.
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::HistoryConfig;
use crate::error::{HistoryError, Outcome};
use crate::manager::HistoryManager;
use crate::operation::Operation;

/// A target together with the history of operations applied to it.
pub struct Session<O: Operation>
where
    O::Target: Sized,
{
    target: O::Target,
    history: HistoryManager<O>,
}

impl<O: Operation> std::fmt::Debug for Session<O>
where
    O::Target: Sized + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target)
            .field("history", &self.history)
            .finish()
    }
}

impl<O: Operation> Session<O>
where
    O::Target: Sized,
{
    /// Wraps `target` with an empty history using the default config.
    pub fn new(target: O::Target) -> Self {
        Self::with_config(target, HistoryConfig::default())
    }

    /// Wraps `target` with an empty history using `config`.
    pub fn with_config(target: O::Target, config: HistoryConfig) -> Self {
        Self {
            target,
            history: HistoryManager::with_config(config),
        }
    }

    /// Read-only view of the target.
    pub fn target(&self) -> &O::Target {
        &self.target
    }

    /// Read-only view of the history.
    pub fn history(&self) -> &HistoryManager<O> {
        &self.history
    }

    /// Mutable access to the history, for capacity changes or `clear`.
    pub fn history_mut(&mut self) -> &mut HistoryManager<O> {
        &mut self.history
    }

    /// See [`HistoryManager::execute`].
    pub fn execute(&mut self, op: O) -> Result<(), HistoryError<O::Error>> {
        self.history.execute(&mut self.target, op)
    }

    /// See [`HistoryManager::undo`].
    pub fn undo(&mut self) -> Result<Outcome, HistoryError<O::Error>> {
        self.history.undo(&mut self.target)
    }

    /// See [`HistoryManager::redo`].
    pub fn redo(&mut self) -> Result<Outcome, HistoryError<O::Error>> {
        self.history.redo(&mut self.target)
    }

    /// Splits the session back into its target and history.
    pub fn into_parts(self) -> (O::Target, HistoryManager<O>) {
        (self.target, self.history)
    }
}

/// A `Session` guarded by one mutex, cloneable across threads.
pub struct SharedSession<O: Operation>
where
    O::Target: Sized,
{
    inner: Arc<Mutex<Session<O>>>,
}

impl<O: Operation> Clone for SharedSession<O>
where
    O::Target: Sized,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Operation> SharedSession<O>
where
    O::Target: Sized,
{
    pub fn new(session: Session<O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session<O>>, HistoryError<O::Error>> {
        self.inner.lock().map_err(|_| HistoryError::Poisoned)
    }

    pub fn execute(&self, op: O) -> Result<(), HistoryError<O::Error>> {
        self.lock()?.execute(op)
    }

    pub fn undo(&self) -> Result<Outcome, HistoryError<O::Error>> {
        self.lock()?.undo()
    }

    pub fn redo(&self) -> Result<Outcome, HistoryError<O::Error>> {
        self.lock()?.redo()
    }

    /// Runs `f` with the session locked, for reads that must see a
    /// consistent target and history.
    ///
    /// # Errors
    ///
    /// Returns `Poisoned` if a previous holder panicked.
    pub fn with<R>(&self, f: impl FnOnce(&Session<O>) -> R) -> Result<R, HistoryError<O::Error>> {
        Ok(f(&*self.lock()?))
    }
}
