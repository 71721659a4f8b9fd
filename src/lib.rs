//! Tasklight - a browser-based personal task list
//!
//! Core modules:
//! - `task`: task model and persisted wire format
//! - `validate`: task name validation
//! - `store`: the task store (mutation, ordering, persistence sync)
//! - `undo`: staged-deletion undo buffer
//! - `storage`: key-value persistence boundary (LocalStorage on web)
//! - `theme`: persisted dark/light preference
//!
//! Everything except the LocalStorage backend and the DOM layer in
//! `main.rs` is platform-agnostic and tested natively.

pub mod storage;
pub mod store;
pub mod task;
pub mod theme;
pub mod undo;
pub mod validate;

pub use store::{TaskPatch, TaskStore};
pub use task::{Priority, Task};
pub use theme::Theme;
pub use undo::UNDO_WINDOW_MS;
