//! Key-value store for device preferences
//!
//! This module provides the string-level [`KeyValueStore`] boundary used by
//! preference owners (the theme store) and a sled-backed [`KvStore`] that
//! implements it.

use serde::{de::DeserializeOwned, Serialize};
use sled::Db;
use std::sync::Arc;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend refused or failed the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Separator used when joining scoped keys
pub const KEY_SEPARATOR: &str = ":";

/// Join key scopes into a single flat key (e.g. `["device", "theme"]` -> `device:theme`)
pub fn scoped_key(scopes: &[&str]) -> String {
    scopes.join(KEY_SEPARATOR)
}

/// String-valued key-value boundary
///
/// `get` returns `Ok(None)` for an absent key; any `Err` is a backend
/// failure the caller may choose to log and ignore.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None for immediate flush)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "jw_companion_kv.db".to_string(),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Sled-backed key-value store
///
/// Values are stored JSON-encoded so typed callers can use [`KvStore::get_json`]
/// and [`KvStore::set_json`], while the [`KeyValueStore`] impl reads and
/// writes plain JSON strings.
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Db>,
}

impl KvStore {
    /// Open a key-value store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        let mut db_config = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression);

        if let Some(ms) = config.flush_every_ms {
            db_config = db_config.flush_every_ms(Some(ms));
        }

        let db = db_config.open()?;
        tracing::debug!(path = %config.path, "opened key-value store");

        Ok(Self { db: Arc::new(db) })
    }

    /// Create an in-memory key-value store (for testing and previews)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db: Arc::new(db) })
    }

    fn check_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Get a JSON-decoded value by key
    pub fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        Self::check_key(key)?;
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value by key, JSON-encoded
    pub fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        Self::check_key(key)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    /// Remove a value by key
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key.as_bytes())?)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Get the number of keys in the store
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

impl KeyValueStore for KvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_json::<String>(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_json(key, &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kv_store_creation() {
        let kv = KvStore::in_memory().unwrap();
        assert!(kv.is_empty());
    }

    #[test]
    fn test_set_and_get_string() {
        let kv = KvStore::in_memory().unwrap();

        KeyValueStore::set(&kv, "device:theme_mode", "dark").unwrap();

        let value = KeyValueStore::get(&kv, "device:theme_mode").unwrap();
        assert_eq!(value, Some("dark".to_string()));
    }

    #[test]
    fn test_get_nonexistent() {
        let kv = KvStore::in_memory().unwrap();
        assert_eq!(KeyValueStore::get(&kv, "nonexistent").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let kv = KvStore::in_memory().unwrap();

        KeyValueStore::set(&kv, "key", "light").unwrap();
        KeyValueStore::set(&kv, "key", "system").unwrap();

        assert_eq!(KeyValueStore::get(&kv, "key").unwrap(), Some("system".to_string()));
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let kv = KvStore::in_memory().unwrap();
        let err = KeyValueStore::set(&kv, "", "dark").unwrap_err();
        assert!(matches!(err, KvError::InvalidKey(_)));
    }

    #[test]
    fn test_non_string_value_is_serialization_error() {
        let kv = KvStore::in_memory().unwrap();
        kv.set_json("count", &42).unwrap();

        let err = KeyValueStore::get(&kv, "count").unwrap_err();
        assert!(matches!(err, KvError::Serialization(_)));
    }

    #[test]
    fn test_remove() {
        let kv = KvStore::in_memory().unwrap();

        kv.set_json("key", &"value").unwrap();
        assert!(kv.contains("key").unwrap());

        assert!(kv.remove("key").unwrap());
        assert!(!kv.contains("key").unwrap());
        assert!(!kv.remove("key").unwrap());
    }

    #[test]
    fn test_scoped_key() {
        assert_eq!(scoped_key(&["device", "theme_mode"]), "device:theme_mode");
        assert_eq!(scoped_key(&["single"]), "single");
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.db");
        let path = path.to_string_lossy().to_string();

        {
            let kv = KvStore::new(KvConfig::new(path.clone()).flush_every_ms(None)).unwrap();
            KeyValueStore::set(&kv, "device:theme_mode", "light").unwrap();
            kv.flush().unwrap();
        }

        let kv = KvStore::new(KvConfig::new(path)).unwrap();
        assert_eq!(
            KeyValueStore::get(&kv, "device:theme_mode").unwrap(),
            Some("light".to_string())
        );
    }

    #[test]
    fn test_config_builder() {
        let config = KvConfig::new("test.db")
            .cache_capacity(32 * 1024 * 1024)
            .use_compression(false)
            .flush_every_ms(Some(1000));

        assert_eq!(config.path, "test.db");
        assert_eq!(config.cache_capacity, 32 * 1024 * 1024);
        assert!(!config.use_compression);
        assert_eq!(config.flush_every_ms, Some(1000));
    }
}
