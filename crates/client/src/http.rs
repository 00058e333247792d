//! Backend HTTP client with the bearer-token interceptor.

use std::sync::{Arc, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use kurum360_core::{AuthError, AuthResult};

use crate::config::ClientConfig;
use crate::storage::{KeyValueStore, TOKEN_KEY};

/// Authentication endpoints never carry an `Authorization` header.
pub fn is_auth_endpoint(url: &Url) -> bool {
    url.path().contains("/auth/")
}

/// Shared HTTP client for every backend call.
///
/// Before a request leaves, [`ApiClient::authorize_request`] attaches
/// `Bearer <token>` (token read from the durable store, falling back to the
/// default bearer installed at login) or strips the header for auth endpoints.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    durable: Arc<dyn KeyValueStore>,
    default_bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, durable: Arc<dyn KeyValueStore>) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::network(format!("failed to build http client: {e}")))?;

        Ok(Self::with_client(http, &config.api_url, durable))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, durable: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                durable,
                default_bearer: RwLock::new(None),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// Install (or remove) the token used when the durable store has none.
    pub fn set_default_bearer(&self, token: Option<String>) {
        let mut slot = self
            .inner
            .default_bearer
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }

    pub fn default_bearer(&self) -> Option<String> {
        self.inner
            .default_bearer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.http.request(method, self.url(path))
    }

    /// Apply the bearer policy to an already-built request.
    pub async fn authorize_request(&self, req: &mut reqwest::Request) {
        if is_auth_endpoint(req.url()) {
            req.headers_mut().remove(AUTHORIZATION);
            return;
        }

        let stored = match self.inner.durable.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("token lookup failed, using default bearer: {e}");
                None
            }
        };

        let token = stored
            .filter(|t| !t.is_empty())
            .or_else(|| self.default_bearer());

        match token.and_then(|t| HeaderValue::from_str(&format!("Bearer {t}")).ok()) {
            Some(value) => {
                req.headers_mut().insert(AUTHORIZATION, value);
            }
            None => {
                req.headers_mut().remove(AUTHORIZATION);
            }
        }
    }

    /// Build, authorize and send a request.
    pub async fn send(&self, builder: RequestBuilder) -> AuthResult<Response> {
        let mut req = builder.build().map_err(transport_error)?;
        self.authorize_request(&mut req).await;

        tracing::debug!(method = %req.method(), path = req.url().path(), "backend request");
        self.inner.http.execute(req).await.map_err(transport_error)
    }

    /// GET a JSON resource, for the CRUD services built on this client.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AuthResult<T> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        resp.json().await.map_err(transport_error)
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> AuthError {
    if err.is_decode() {
        AuthError::decode(err.to_string())
    } else {
        AuthError::network(err.to_string())
    }
}

/// Non-success status on an authorized call: 401/403 reject the session,
/// anything else is treated as transient.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> AuthError {
    let message = crate::backend::error_message(body).unwrap_or_else(|| status.to_string());
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        AuthError::session_expired(message)
    } else {
        AuthError::network(format!("backend responded {status}: {message}"))
    }
}
