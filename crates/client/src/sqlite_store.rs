//! SQLite-backed durable session store.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Durable key-value store persisted in a SQLite file.
///
/// The connection pool is created lazily on first use, so constructing the
/// store never fails; setup errors surface on the first read or write.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    location: Location,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Private in-memory database (single connection, lives as long as the pool).
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            pool: Arc::new(Mutex::new(None)),
        }
    }

    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create session directory at {:?}", parent))?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .max_connections(4)
                    .connect_with(options)
                    .await
                    .with_context(|| format!("failed to open session store at {:?}", path))?
            }
            Location::Memory => {
                let options = SqliteConnectOptions::from_str("sqlite::memory:")
                    .context("invalid in-memory sqlite url")?;
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
                    .context("failed to open in-memory session store")?
            }
        };

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_entries (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create session_entries table")?;

        tracing::debug!(location = ?self.location, "session store initialized");
        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let pool = self.pool().await?;
        let row = sqlx::query(
            r#"
            SELECT value
            FROM session_entries
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&pool)
        .await
        .with_context(|| format!("failed to read session entry {key}"))?;

        match row {
            Some(row) => {
                let value: String = row
                    .try_get("value")
                    .with_context(|| format!("failed to decode session entry {key}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let pool = self.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO session_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .with_context(|| format!("failed to write session entry {key}"))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let pool = self.pool().await?;
        sqlx::query(
            r#"
            DELETE FROM session_entries
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to remove session entry {key}"))?;

        Ok(())
    }
}

/// Resolve `{app_data_dir}/kurum360/session.db`.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    dir.push("kurum360");
    dir.push("session.db");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{TOKEN_KEY, USER_KEY};

    #[tokio::test]
    async fn in_memory_store_upserts_and_removes() {
        let store = SqliteStore::in_memory();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);

        store.set(TOKEN_KEY, "a").await.unwrap();
        store.set(TOKEN_KEY, "b").await.unwrap();
        store.set(USER_KEY, r#"{"id":1}"#).await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("b"));

        store.remove(TOKEN_KEY).await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
        assert!(store.get(USER_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("kurum360-store-{}", std::process::id()));
        let path = dir.join("session.db");

        {
            let store = SqliteStore::open(&path);
            store.set(TOKEN_KEY, "persisted").await.unwrap();
        }

        let reopened = SqliteStore::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY).await.unwrap().as_deref(), Some("persisted"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
