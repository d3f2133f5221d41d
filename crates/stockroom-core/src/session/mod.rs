//! Session persistence and lifecycle signalling.
//!
//! This module provides:
//! - `SessionStore`: the only writer of the persisted token and cached user
//! - `KeyValueStorage` backends: files, OS keychain, or memory
//! - `SessionEvents`: broadcast of login, logout and expiry transitions
//!
//! The token is stored as a raw string; the user as JSON text.

pub mod state;
pub mod storage;
pub mod store;

pub use state::{SessionEvent, SessionEvents, SessionState};
pub use storage::{FileStorage, KeyValueStorage, KeyringStorage, MemoryStorage, StorageError};
pub use store::SessionStore;
