//! Core library for the stockroom catalog client.
//!
//! The session core: a `SessionStore` that owns the persisted token and
//! cached user, a `Gateway` that attaches the token to every request and
//! drops it when the server answers 401, and the `AuthService` and
//! `ProductService` that screens call.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiError, Gateway};
pub use config::{Config, StorageBackend};
pub use services::{AuthService, ProductService};
pub use session::{SessionEvent, SessionState, SessionStore, StorageError};
