//! HTTP access to the catalog backend.
//!
//! This module provides the `Gateway`, the single configured client that
//! every service uses, and `ApiError`, the closed set of failures callers
//! see. Requests carry the stored session token as a bearer credential.

pub mod error;
pub mod gateway;

pub use error::ApiError;
pub use gateway::Gateway;
