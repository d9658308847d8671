/// Concrete resources and the reversible operations that edit them.
///
/// - `FileStore` with an in-memory (`MemoryStore`) and an on-disk
///   (`DirStore`) implementation, edited through `FileOp`.
/// - `TextBuffer`, a rope-backed text resource edited through `TextOp`.
pub mod buffer;
pub mod dir_store;
pub mod file_op;
pub mod store;
pub mod text_op;

pub use buffer::{TextBuffer, TextError};
pub use dir_store::DirStore;
pub use file_op::FileOp;
pub use store::{FileStore, MemoryStore, StoreError};
pub use text_op::TextOp;
