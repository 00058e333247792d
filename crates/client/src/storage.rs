//! Durable key-value storage for the client-side session.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const COMPANY_PROFILE_KEY: &str = "companyProfile";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failed: {0}")]
    Backend(String),

    #[error("failed to encode stored value: {0}")]
    Encode(String),
}

impl From<anyhow::Error> for StorageError {
    fn from(value: anyhow::Error) -> Self {
        Self::Backend(format!("{value:#}"))
    }
}

impl From<StorageError> for kurum360_core::AuthError {
    fn from(value: StorageError) -> Self {
        kurum360_core::AuthError::storage(value.to_string())
    }
}

/// String key-value store readable only by the client process.
///
/// The session service is the only writer of the session keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store, used in tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
