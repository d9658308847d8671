/// Replays parsed script commands against a file store.
use std::io::Write;

use anyhow::Result;
use revert_history::{HistoryConfig, HistoryError, HistoryManager, Operation, Outcome};
use revert_resources::{FileOp, FileStore, StoreError};

use crate::script::Command;

/// Counters reported at the end of a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failures that may have left the store out of step with the history.
    pub needs_reconciliation: usize,
}

/// A store plus the history of operations run against it.
pub struct Replay {
    store: Box<dyn FileStore>,
    history: HistoryManager<FileOp>,
    summary: Summary,
}

impl std::fmt::Debug for Replay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replay")
            .field("history", &self.history)
            .field("summary", &self.summary)
            .finish()
    }
}

impl Replay {
    pub fn new(store: Box<dyn FileStore>, config: HistoryConfig) -> Self {
        Self {
            store,
            history: HistoryManager::with_config(config),
            summary: Summary::default(),
        }
    }

    pub fn store(&self) -> &dyn FileStore {
        &*self.store
    }

    pub fn history(&self) -> &HistoryManager<FileOp> {
        &self.history
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Runs one command, printing its result to `out`.
    ///
    /// Operation failures are printed and counted, not returned: the script
    /// carries on with the next line.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails or the store cannot
    /// be listed.
    pub fn run(&mut self, line: usize, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Execute(op) => {
                let label = op.describe();
                let result = self.history.execute(&mut *self.store, op);
                self.report(line, &label, result.map(|()| Outcome::Done), out)?;
            }
            Command::Undo => {
                let label = step_label(self.history.peek_undo(), "undo");
                let result = self.history.undo(&mut *self.store);
                self.report(line, &label, result, out)?;
            }
            Command::Redo => {
                let label = step_label(self.history.peek_redo(), "redo");
                let result = self.history.redo(&mut *self.store);
                self.report(line, &label, result, out)?;
            }
            Command::List => {
                let names = self.store.list()?;
                if names.is_empty() {
                    writeln!(out, "{line:>4}  (no files)")?;
                }
                for name in names {
                    match self.store.read_file(&name) {
                        Ok(content) => writeln!(out, "{line:>4}  {name} ({} bytes)", content.len())?,
                        Err(e) => writeln!(out, "{line:>4}  {name} (unreadable: {e})")?,
                    }
                }
            }
            Command::History => {
                let undo = describe_all(self.history.undo_stack());
                let redo = describe_all(self.history.redo_stack());
                writeln!(out, "{line:>4}  undo: [{undo}]")?;
                writeln!(out, "{line:>4}  redo: [{redo}]")?;
            }
        }
        Ok(())
    }

    fn report(
        &mut self,
        line: usize,
        label: &str,
        result: Result<Outcome, HistoryError<StoreError>>,
        out: &mut impl Write,
    ) -> Result<()> {
        match result {
            Ok(Outcome::Done) => {
                self.summary.succeeded += 1;
                writeln!(out, "{line:>4}  ok      {label}")?;
            }
            Ok(Outcome::EmptyHistory) => {
                writeln!(out, "{line:>4}  empty   nothing to {label}")?;
            }
            Err(e) => {
                self.summary.failed += 1;
                if e.needs_reconciliation() {
                    self.summary.needs_reconciliation += 1;
                    tracing::warn!("line {line}: {label} failed and needs manual reconciliation");
                }
                writeln!(out, "{line:>4}  failed  {label}: {e}")?;
            }
        }
        Ok(())
    }
}

/// "undo (create a.txt)", or the bare verb when the stack is empty.
fn step_label(next: Option<&FileOp>, verb: &str) -> String {
    match next {
        Some(op) => format!("{verb} ({})", op.describe()),
        None => verb.to_string(),
    }
}

fn describe_all(ops: &[FileOp]) -> String {
    ops.iter().map(|op| op.describe()).collect::<Vec<_>>().join(", ")
}
