//! `kurum360-client`
//!
//! **Responsibility:** the session store of the dashboard client.
//!
//! This crate provides:
//! - An HTTP client that attaches (or strips) the bearer token per request
//! - The backend contract for login, registration and identity refresh
//! - Durable and cookie persistence of the session
//! - [`AuthService`], the single owner of session state
//! - [`RoleGuard`], the component-level route guard

pub mod backend;
pub mod config;
pub mod cookies;
pub mod guard;
pub mod http;
pub mod persistence;
pub mod session;
pub mod sqlite_store;
pub mod storage;

pub use backend::{AuthBackend, AuthResponse, StrapiBackend};
pub use config::{ClientConfig, ConfigError, DurableStoreConfig};
pub use cookies::{CookieStore, MemoryCookieStore};
pub use guard::{GuardOutcome, Navigator, RoleGuard};
pub use http::{ApiClient, is_auth_endpoint};
pub use persistence::{PersistReport, SessionPersistence};
pub use session::{AuthService, RefreshPolicy, Session};
pub use sqlite_store::SqliteStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
