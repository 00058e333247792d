//! Persisting the session to its two storage layers.
//!
//! The durable store is written first, then the cookie jar. The two writes are
//! not atomic: a failure in one layer leaves the other updated. The session
//! service keeps its in-memory copy authoritative and the next successful
//! refresh rewrites both layers.

use std::sync::Arc;

use kurum360_auth::{CompanyProfile, User};

use crate::cookies::{CookieStore, session_cookie};
use crate::session::Session;
use crate::storage::{COMPANY_PROFILE_KEY, KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};

/// Per-layer outcome of one persist call.
#[derive(Debug)]
pub struct PersistReport {
    pub durable: Result<(), StorageError>,
    pub cookies: Result<(), StorageError>,
}

/// The two sinks behind a single "persist session" operation.
#[derive(Clone)]
pub struct SessionPersistence {
    durable: Arc<dyn KeyValueStore>,
    cookies: Arc<dyn CookieStore>,
    cookie_ttl: chrono::Duration,
}

impl SessionPersistence {
    pub fn new(durable: Arc<dyn KeyValueStore>, cookies: Arc<dyn CookieStore>, cookie_ttl: chrono::Duration) -> Self {
        Self {
            durable,
            cookies,
            cookie_ttl,
        }
    }

    pub fn durable(&self) -> &Arc<dyn KeyValueStore> {
        &self.durable
    }

    pub fn cookies(&self) -> &Arc<dyn CookieStore> {
        &self.cookies
    }

    /// Write `session` to both layers; absent fields are removed.
    pub async fn persist(&self, session: &Session) -> PersistReport {
        let report = PersistReport {
            durable: self.write_durable(session).await,
            cookies: self.write_cookies(session),
        };

        if let Err(e) = &report.durable {
            tracing::warn!("durable session write failed: {e}");
        }
        if let Err(e) = &report.cookies {
            tracing::warn!("session cookie write failed: {e}");
        }
        report
    }

    /// Purge the session keys from both layers.
    pub async fn clear(&self) -> PersistReport {
        self.persist(&Session::default()).await
    }

    /// Best-effort read of the durable copy. Unreadable entries are skipped.
    pub async fn load(&self) -> Session {
        let token = self.read(TOKEN_KEY).await;
        let user = self.read(USER_KEY).await.and_then(|raw| decode::<User>(USER_KEY, &raw));
        let company_profile = self
            .read(COMPANY_PROFILE_KEY)
            .await
            .and_then(|raw| decode::<CompanyProfile>(COMPANY_PROFILE_KEY, &raw));

        Session {
            token,
            user,
            company_profile,
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.durable.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "failed to read durable session entry: {e}");
                None
            }
        }
    }

    async fn write_durable(&self, session: &Session) -> Result<(), StorageError> {
        put_or_remove(self.durable.as_ref(), TOKEN_KEY, session.token.clone()).await?;
        put_or_remove(self.durable.as_ref(), USER_KEY, encode(session.user.as_ref())?).await?;
        put_or_remove(
            self.durable.as_ref(),
            COMPANY_PROFILE_KEY,
            encode(session.company_profile.as_ref())?,
        )
        .await
    }

    fn write_cookies(&self, session: &Session) -> Result<(), StorageError> {
        match &session.token {
            Some(token) => self.cookies.set(session_cookie(TOKEN_KEY, token, self.cookie_ttl))?,
            None => self.cookies.remove(TOKEN_KEY)?,
        }
        match encode(session.user.as_ref())? {
            Some(user) => self.cookies.set(session_cookie(USER_KEY, &user, self.cookie_ttl)),
            None => self.cookies.remove(USER_KEY),
        }
    }
}

async fn put_or_remove(store: &dyn KeyValueStore, key: &str, value: Option<String>) -> Result<(), StorageError> {
    match value {
        Some(value) => store.set(key, &value).await,
        None => store.remove(key).await,
    }
}

fn encode<T: serde::Serialize>(value: Option<&T>) -> Result<Option<String>, StorageError> {
    value
        .map(|v| serde_json::to_string(v).map_err(|e| StorageError::Encode(e.to_string())))
        .transpose()
}

fn decode<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, "discarding unreadable durable session entry: {e}");
            None
        }
    }
}
