//! The session service: single owner of "who is the current actor".

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use kurum360_auth::{CompanyProfile, RoleType, SessionSnapshot, User, capabilities};
use kurum360_core::{AuthError, AuthResult};

use crate::backend::{AuthBackend, AuthResponse, StrapiBackend};
use crate::config::{ClientConfig, DurableStoreConfig};
use crate::cookies::{CookieStore, MemoryCookieStore};
use crate::http::ApiClient;
use crate::persistence::SessionPersistence;
use crate::sqlite_store::SqliteStore;
use crate::storage::{KeyValueStore, MemoryStore};

/// In-memory session state.
///
/// A user is only held together with a token; `company_profile` only
/// accompanies a company (`authenticated`) user. A token may briefly be held
/// alone between hydration and the first refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub company_profile: Option<CompanyProfile>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none() && self.company_profile.is_none()
    }

    /// Drop whatever violates the session invariants.
    pub fn normalized(self) -> Self {
        let Some(token) = self.token else {
            return Self::default();
        };
        let is_company = self
            .user
            .as_ref()
            .is_some_and(|u| u.role_type() == Some(RoleType::Authenticated));

        Self {
            token: Some(token),
            company_profile: self.company_profile.filter(|_| is_company),
            user: self.user,
        }
    }
}

/// What a failed refresh does to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Any refresh failure clears the session.
    #[default]
    ClearAlways,
    /// Only a backend rejection (or a missing token) clears the session;
    /// transport and decode failures keep it.
    ClearOnRejection,
}

impl RefreshPolicy {
    pub fn clears_on(&self, err: &AuthError) -> bool {
        match self {
            RefreshPolicy::ClearAlways => true,
            RefreshPolicy::ClearOnRejection => err.is_rejection(),
        }
    }
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear-always" => Ok(RefreshPolicy::ClearAlways),
            "clear-on-rejection" => Ok(RefreshPolicy::ClearOnRejection),
            other => Err(format!("unknown refresh policy: {other}")),
        }
    }
}

#[derive(Debug, Default)]
struct RefreshSlot {
    epoch: u64,
    /// Token the last refresh ran for.
    token: Option<String>,
    outcome: Option<AuthResult<()>>,
}

/// Session store of the dashboard client.
///
/// Constructed once at bootstrap and shared (`Arc<AuthService>`). Reads are
/// synchronous; the lifecycle operations (`login`, `register_company`,
/// `check_auth`, `logout`, `reset_password`) are the only writers.
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    api: ApiClient,
    persistence: SessionPersistence,
    policy: RefreshPolicy,
    state: RwLock<Session>,
    refresh: tokio::sync::Mutex<RefreshSlot>,
    refresh_epoch: AtomicU64,
}

impl AuthService {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        api: ApiClient,
        persistence: SessionPersistence,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            backend,
            api,
            persistence,
            policy,
            state: RwLock::new(Session::default()),
            refresh: tokio::sync::Mutex::new(RefreshSlot::default()),
            refresh_epoch: AtomicU64::new(0),
        }
    }

    /// Wire the Strapi backend, the configured durable store and an in-process
    /// cookie jar.
    pub fn from_config(config: &ClientConfig) -> AuthResult<Self> {
        let durable: Arc<dyn KeyValueStore> = match &config.durable_store {
            DurableStoreConfig::Memory => Arc::new(MemoryStore::new()),
            DurableStoreConfig::Sqlite(path) => Arc::new(SqliteStore::open(path)),
        };
        let cookies: Arc<dyn CookieStore> = Arc::new(MemoryCookieStore::new());

        let api = ApiClient::new(config, durable.clone())?;
        let backend = Arc::new(StrapiBackend::new(api.clone()));
        let persistence = SessionPersistence::new(durable, cookies, config.cookie_ttl);

        Ok(Self::new(backend, api, persistence, config.refresh_policy))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn persistence(&self) -> &SessionPersistence {
        &self.persistence
    }

    // ── accessors ───────────────────────────────────────────────────────────

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn replace_state(&self, session: Session) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    /// Replace the state only while it still holds `token`.
    fn replace_state_if(&self, token: &Option<String>, session: Session) -> bool {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.token != *token {
            return false;
        }
        *state = session;
        true
    }

    pub fn session(&self) -> Session {
        self.read_state().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read_state().user.clone()
    }

    pub fn company_profile(&self) -> Option<CompanyProfile> {
        self.read_state().company_profile.clone()
    }

    /// Token and user present and the account confirmed. `blocked` is ignored.
    pub fn is_authenticated(&self) -> bool {
        let state = self.read_state();
        state.token.is_some() && state.user.as_ref().is_some_and(|u| u.confirmed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_user(self.read_state().user.as_ref())
    }

    pub fn is_employee(&self) -> bool {
        capabilities::is_employee(self.read_state().user.as_ref())
    }

    pub fn is_company(&self) -> bool {
        capabilities::is_company(self.read_state().user.as_ref())
    }

    pub fn is_worker(&self) -> bool {
        capabilities::is_worker(self.read_state().user.as_ref())
    }

    pub fn is_ahi_ik(&self) -> bool {
        capabilities::is_ahi_ik(self.read_state().user.as_ref())
    }

    pub fn is_blocked(&self) -> bool {
        capabilities::is_blocked(self.read_state().user.as_ref())
    }

    pub fn is_company_frozen(&self) -> bool {
        capabilities::is_company_frozen(self.read_state().company_profile.as_ref())
    }

    pub fn dashboard_url(&self) -> &'static str {
        capabilities::dashboard_url(self.read_state().user.as_ref())
    }

    /// `Cookie` header the edge interceptor would receive from this client.
    pub fn cookie_header(&self) -> Option<String> {
        self.persistence.cookies().header_value()
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    /// Exchange credentials for a session, then refresh canonical state.
    pub async fn login(&self, identifier: &str, password: &str) -> AuthResult<()> {
        let response = self.backend.login(identifier, password).await?;
        tracing::info!(user_id = %response.user.id, "login accepted");
        self.establish(response).await
    }

    /// Register a company account; the backend assigns the `authenticated` role.
    pub async fn register_company(&self, username: &str, email: &str, password: &str) -> AuthResult<()> {
        let response = self.backend.register(username, email, password).await?;
        tracing::info!(user_id = %response.user.id, "company registration accepted");
        self.establish(response).await
    }

    /// Ask the backend to mail a reset code. The session is untouched.
    pub async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        if email.trim().is_empty() {
            return Err(AuthError::validation("email is required"));
        }
        self.backend.forgot_password(email.trim()).await
    }

    /// Redeem a reset code; success signs the user in like `login`.
    pub async fn reset_password(&self, code: &str, password: &str, password_confirmation: &str) -> AuthResult<()> {
        if password != password_confirmation {
            return Err(AuthError::validation("Passwords do not match"));
        }
        let response = self
            .backend
            .reset_password(code, password, password_confirmation)
            .await?;
        self.establish(response).await
    }

    async fn establish(&self, response: AuthResponse) -> AuthResult<()> {
        let AuthResponse { jwt, user } = response;
        let session = Session {
            token: Some(jwt.clone()),
            user: Some(user),
            company_profile: None,
        };

        self.replace_state(session.clone());
        self.persistence.persist(&session).await;
        self.api.set_default_bearer(Some(jwt));

        self.check_auth().await
    }

    /// Refetch the canonical user (and company profile) for the current token.
    ///
    /// Concurrent callers for the same token share one in-flight refresh:
    /// whoever arrives while it runs receives its outcome. A caller whose token
    /// changed meanwhile (a login during a stale refresh) runs its own. On
    /// failure the session is cleared according to the [`RefreshPolicy`] and
    /// the error is returned.
    pub async fn check_auth(&self) -> AuthResult<()> {
        let seen = self.refresh_epoch.load(Ordering::Acquire);
        let mut slot = self.refresh.lock().await;
        let token = self.token();

        if slot.epoch != seen && slot.token == token {
            if let Some(outcome) = &slot.outcome {
                tracing::debug!("joined a refresh that completed while waiting");
                return outcome.clone();
            }
        }

        let outcome = self.refresh_now(&token).await;
        slot.epoch += 1;
        slot.token = token;
        slot.outcome = Some(outcome.clone());
        self.refresh_epoch.store(slot.epoch, Ordering::Release);
        outcome
    }

    async fn refresh_now(&self, token: &Option<String>) -> AuthResult<()> {
        match self.fetch_canonical(token).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if !self.policy.clears_on(&err) {
                    tracing::warn!("session refresh failed, keeping session: {err}");
                } else if self.clear_if(token).await {
                    tracing::warn!("session refresh failed, cleared session: {err}");
                } else {
                    tracing::debug!("stale session refresh failed after a new session was set: {err}");
                }
                Err(err)
            }
        }
    }

    async fn fetch_canonical(&self, token: &Option<String>) -> AuthResult<()> {
        let Some(jwt) = token.clone() else {
            return Err(AuthError::session_expired("No token found"));
        };

        let user = self.backend.me().await?;

        let company_profile = if user.role_type() == Some(RoleType::Authenticated) {
            let profile = self.backend.company_profiles().await?.into_iter().next();
            if profile.is_none() {
                tracing::warn!(user_id = %user.id, "company account has no company profile");
            }
            profile
        } else {
            None
        };

        let session = Session {
            token: Some(jwt),
            user: Some(user),
            company_profile,
        };
        if !self.replace_state_if(token, session.clone()) {
            tracing::debug!("session changed during refresh; discarding refreshed user");
            return Ok(());
        }
        self.persistence.persist(&session).await;
        Ok(())
    }

    /// Clear memory, both storage layers and the default bearer. Never fails.
    pub async fn logout(&self) {
        self.clear().await;
        tracing::info!("logged out");
    }

    async fn clear(&self) {
        self.replace_state(Session::default());
        self.api.set_default_bearer(None);
        self.persistence.clear().await;
    }

    /// Clear only while the state still holds `token`.
    async fn clear_if(&self, token: &Option<String>) -> bool {
        if !self.replace_state_if(token, Session::default()) {
            return false;
        }
        self.api.set_default_bearer(None);
        self.persistence.clear().await;
        true
    }

    // ── startup ─────────────────────────────────────────────────────────────

    /// Load the durable copy into memory. Returns whether a token was found.
    pub async fn hydrate(&self) -> bool {
        let stored = self.persistence.load().await.normalized();
        let token = stored.token.clone();
        self.replace_state(stored);
        self.api.set_default_bearer(token.clone());
        token.is_some()
    }

    /// Hydrate, then trust only a live refresh. A failed refresh is logged and
    /// startup continues unauthenticated.
    pub async fn bootstrap(&self) {
        if !self.hydrate().await {
            tracing::debug!("no stored session");
            return;
        }
        if let Err(e) = self.check_auth().await {
            tracing::info!("stored session could not be refreshed: {e}");
        }
    }
}
