//! Client configuration, read from the environment at bootstrap.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::session::RefreshPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:1337";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("could not resolve a default session database path: {0}")]
    NoDataDir(String),
}

/// Where the durable session copy lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurableStoreConfig {
    /// Process memory only; nothing survives a restart.
    Memory,
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub api_url: String,
    pub cookie_ttl: chrono::Duration,
    pub http_timeout: Duration,
    pub refresh_policy: RefreshPolicy,
    pub durable_store: DurableStoreConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cookie_ttl: chrono::Duration::days(1),
            http_timeout: Duration::from_secs(30),
            refresh_policy: RefreshPolicy::default(),
            durable_store: DurableStoreConfig::Memory,
        }
    }
}

impl ClientConfig {
    /// Read `KURUM360_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// - `KURUM360_API_URL` (default `http://localhost:1337`)
    /// - `KURUM360_COOKIE_TTL_DAYS` (default 1)
    /// - `KURUM360_HTTP_TIMEOUT_SECS` (default 30)
    /// - `KURUM360_REFRESH_POLICY`: `clear-always` | `clear-on-rejection`
    /// - `KURUM360_SESSION_DB`: sqlite path, or `memory`; unset means the
    ///   default path under the OS data directory
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = match lookup("KURUM360_API_URL") {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => {
                tracing::warn!("KURUM360_API_URL not set; using {DEFAULT_API_URL}");
                defaults.api_url
            }
        };

        let cookie_ttl = match lookup("KURUM360_COOKIE_TTL_DAYS") {
            Some(raw) => chrono::Duration::days(parse_positive("KURUM360_COOKIE_TTL_DAYS", &raw)?),
            None => defaults.cookie_ttl,
        };

        let http_timeout = match lookup("KURUM360_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_positive("KURUM360_HTTP_TIMEOUT_SECS", &raw)? as u64),
            None => defaults.http_timeout,
        };

        let refresh_policy = match lookup("KURUM360_REFRESH_POLICY") {
            Some(raw) => raw.parse::<RefreshPolicy>().map_err(|_| ConfigError::Invalid {
                key: "KURUM360_REFRESH_POLICY",
                value: raw,
            })?,
            None => defaults.refresh_policy,
        };

        let durable_store = match lookup("KURUM360_SESSION_DB") {
            Some(raw) if raw.eq_ignore_ascii_case("memory") => DurableStoreConfig::Memory,
            Some(raw) if !raw.trim().is_empty() => DurableStoreConfig::Sqlite(PathBuf::from(raw)),
            _ => DurableStoreConfig::Sqlite(
                crate::sqlite_store::default_db_path().map_err(|e| ConfigError::NoDataDir(e.to_string()))?,
            ),
        };

        Ok(Self {
            api_url,
            cookie_ttl,
            http_timeout,
            refresh_policy,
            durable_store,
        })
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}
