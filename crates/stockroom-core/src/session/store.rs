use std::sync::Arc;

use tracing::debug;

use super::storage::{KeyValueStorage, MemoryStorage, StorageError};
use crate::models::User;

/// Storage key for the raw bearer token
pub(crate) const TOKEN_KEY: &str = "auth_token";

/// Storage key for the JSON-encoded user profile
pub(crate) const USER_KEY: &str = "auth_user";

/// Sole owner of the persisted session: the bearer token and the cached user.
///
/// Clone is cheap; clones share the same backend. Concurrent writes to the
/// same key are not serialized here, so the last write wins.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token).await
    }

    pub async fn get_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(TOKEN_KEY).await
    }

    pub async fn clear_token(&self) -> Result<(), StorageError> {
        debug!("Clearing stored token");
        self.storage.remove(TOKEN_KEY).await
    }

    pub async fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &encoded).await
    }

    pub async fn get_user(&self) -> Result<Option<User>, StorageError> {
        match self.storage.get(USER_KEY).await? {
            Some(encoded) => Ok(Some(serde_json::from_str(&encoded)?)),
            None => Ok(None),
        }
    }

    pub async fn clear_user(&self) -> Result<(), StorageError> {
        self.storage.remove(USER_KEY).await
    }

    /// Remove both token and user. Both removals are attempted even if one fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let (token, user) = futures::join!(self.clear_token(), self.clear_user());
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(phone: Option<&str>) -> User {
        User {
            id: "42".to_string(),
            email: "a@b.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            phone: phone.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_empty_store_reads_absent() {
        let store = SessionStore::in_memory();
        assert_eq!(store.get_token().await.unwrap(), None);
        assert_eq!(store.get_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_user_roundtrip_with_and_without_phone() {
        let store = SessionStore::in_memory();

        let with_phone = user(Some("555-0100"));
        store.set_user(&with_phone).await.unwrap();
        assert_eq!(store.get_user().await.unwrap(), Some(with_phone));

        let without_phone = user(None);
        store.set_user(&without_phone).await.unwrap();
        assert_eq!(store.get_user().await.unwrap(), Some(without_phone));
    }

    #[tokio::test]
    async fn test_token_set_overwrite_and_clear() {
        let store = SessionStore::in_memory();
        store.set_token("T1").await.unwrap();
        store.set_token("T2").await.unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("T2"));

        store.clear_token().await.unwrap();
        store.clear_token().await.unwrap();
        assert_eq!(store.get_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_token_keeps_user() {
        let store = SessionStore::in_memory();
        store.set_token("T1").await.unwrap();
        store.set_user(&user(None)).await.unwrap();

        store.clear_token().await.unwrap();
        assert_eq!(store.get_token().await.unwrap(), None);
        assert!(store.get_user().await.unwrap().is_some());

        store.clear().await.unwrap();
        assert_eq!(store.get_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_user_is_a_storage_error() {
        let backend = Arc::new(MemoryStorage::new());
        backend.set(USER_KEY, "{not json").await.unwrap();

        let store = SessionStore::new(backend);
        assert!(matches!(
            store.get_user().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_backend() {
        let store = SessionStore::in_memory();
        let other = store.clone();
        store.set_token("shared").await.unwrap();
        assert_eq!(other.get_token().await.unwrap().as_deref(), Some("shared"));
    }
}
