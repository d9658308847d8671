/// Reversible operations with an undo/redo history.
///
/// Provides the `Operation` capability (apply + invert against a target
/// resource) and a `HistoryManager` that sequences operations through an
/// undo stack and a redo stack. History lives in memory only.
pub mod config;
pub mod error;
pub mod manager;
pub mod operation;
pub mod session;

pub use config::HistoryConfig;
pub use error::{HistoryError, Outcome};
pub use manager::HistoryManager;
pub use operation::Operation;
pub use session::{Session, SharedSession};
