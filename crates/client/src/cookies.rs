//! Cookie layer of the session: the copy the edge interceptor can read.

use std::collections::BTreeMap;
use std::sync::Mutex;

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};

use crate::storage::StorageError;

/// Build a session cookie scoped to the whole site.
pub fn session_cookie(name: &str, value: &str, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value.to_owned()))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Cookie jar written by the session service.
pub trait CookieStore: Send + Sync {
    fn set(&self, cookie: Cookie<'static>) -> Result<(), StorageError>;

    /// Current (unexpired) value of a cookie.
    fn get(&self, name: &str) -> Option<String>;

    fn remove(&self, name: &str) -> Result<(), StorageError>;

    /// `Cookie` request header carrying every live cookie, values percent-encoded.
    fn header_value(&self) -> Option<String>;
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// In-process cookie jar honoring `Max-Age`.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredCookie>> {
        self.cookies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn live(&self) -> Vec<(String, String)> {
        let now = Utc::now();
        let mut cookies = self.lock();
        cookies.retain(|_, c| c.expires_at.is_none_or(|at| at > now));
        cookies
            .iter()
            .map(|(name, c)| (name.clone(), c.value.clone()))
            .collect()
    }
}

impl CookieStore for MemoryCookieStore {
    fn set(&self, cookie: Cookie<'static>) -> Result<(), StorageError> {
        let expires_at = cookie
            .max_age()
            .map(|age| Utc::now() + chrono::Duration::seconds(age.whole_seconds()));

        if expires_at.is_some_and(|at| at <= Utc::now()) {
            self.lock().remove(cookie.name());
            return Ok(());
        }

        self.lock().insert(
            cookie.name().to_string(),
            StoredCookie {
                value: cookie.value().to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn get(&self, name: &str) -> Option<String> {
        self.live()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.lock().remove(name);
        Ok(())
    }

    fn header_value(&self) -> Option<String> {
        let pairs: Vec<String> = self
            .live()
            .into_iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(&value)))
            .collect();

        if pairs.is_empty() { None } else { Some(pairs.join("; ")) }
    }
}
