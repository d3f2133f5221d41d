//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use wiremock::MockServer;

use crate::models::User;
use crate::session::{KeyValueStorage, MemoryStorage, SessionStore, StorageError};

/// Storage whose every operation fails, as a full or locked-down disk would.
pub struct FailingStorage;

#[async_trait]
impl KeyValueStorage for FailingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("read denied".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("write denied".to_string()))
    }
}

/// Memory storage that refuses writes to a single key and serves everything else.
pub struct RejectingStorage {
    inner: MemoryStorage,
    rejected_key: &'static str,
}

impl RejectingStorage {
    pub fn new(inner: MemoryStorage, rejected_key: &'static str) -> Self {
        Self { inner, rejected_key }
    }
}

#[async_trait]
impl KeyValueStorage for RejectingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.rejected_key {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

pub fn failing_store() -> SessionStore {
    SessionStore::new(Arc::new(FailingStorage))
}

pub fn sample_user() -> User {
    User {
        id: "1".to_string(),
        email: "a@b.com".to_string(),
        full_name: "A".to_string(),
        phone: None,
    }
}

/// True when no request the server saw carried an Authorization header.
pub async fn no_auth_header(server: &MockServer) -> bool {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .all(|r| !r.headers.contains_key("authorization"))
}
