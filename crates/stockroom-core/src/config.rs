//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! backend address, request timeout, where the session is persisted, and
//! the last email used to sign in.
//!
//! Configuration is stored at `~/.config/stockroom/config.json`. The
//! `STOCKROOM_API_URL` environment variable overrides the backend address.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::gateway::DEFAULT_TIMEOUT_SECS;
use crate::api::Gateway;
use crate::session::{FileStorage, KeyValueStorage, KeyringStorage, MemoryStorage, SessionStore};

/// Application name used for config/data directory paths and the keychain service
const APP_NAME: &str = "stockroom";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "STOCKROOM_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Where the session token and cached user are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub storage_backend: StorageBackend,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            storage_backend: StorageBackend::default(),
            last_email: None,
        }
    }
}

impl Config {
    /// Load from the user config directory, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the file-backed session.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find local data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Open the session store on the configured backend.
    pub fn open_store(&self) -> Result<SessionStore> {
        let storage: Arc<dyn KeyValueStorage> = match self.storage_backend {
            StorageBackend::File => Arc::new(FileStorage::new(Self::data_dir()?)),
            StorageBackend::Keyring => Arc::new(KeyringStorage::new(APP_NAME)),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(SessionStore::new(storage))
    }

    /// Build the shared gateway over the configured store.
    pub fn connect(&self) -> Result<Gateway> {
        let store = self.open_store()?;
        Gateway::with_timeout(self.api_base_url.clone(), self.request_timeout(), store)
            .context("Failed to create HTTP gateway")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert_eq!(config.last_email, None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"storage_backend": "keyring", "last_email": "a@b.com"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Keyring);
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "https://shop.example.com/api".to_string(),
            request_timeout_secs: 5,
            storage_backend: StorageBackend::Memory,
            last_email: Some("a@b.com".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url, "https://shop.example.com/api");
        assert_eq!(loaded.request_timeout_secs, 5);
        assert_eq!(loaded.storage_backend, StorageBackend::Memory);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_url_override() {
        let mut config = Config::default();
        config.apply_overrides(Some("   ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);

        config.apply_overrides(Some(" https://api.example.com ".to_string()));
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_memory_backend_connects() {
        let config = Config {
            storage_backend: StorageBackend::Memory,
            ..Default::default()
        };
        let gateway = config.connect().unwrap();
        assert_eq!(gateway.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(gateway.store().get_token().await.unwrap(), None);
    }
}
