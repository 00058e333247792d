//! Backend authentication contract and its Strapi REST implementation.

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};

use kurum360_auth::{CompanyProfile, User};
use kurum360_core::{AuthError, AuthResult};

use crate::http::{ApiClient, transport_error};

pub const LOGIN_PATH: &str = "/api/auth/local";
pub const REGISTER_PATH: &str = "/api/auth/local/register";
pub const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";
pub const ME_PATH: &str = "/api/users/me?populate[]=role";
pub const COMPANY_PROFILES_PATH: &str = "/api/company-profiles";

/// Successful credential exchange.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: User,
}

/// Identity operations the session service needs from the backend.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> AuthResult<AuthResponse>;

    async fn register(&self, username: &str, email: &str, password: &str) -> AuthResult<AuthResponse>;

    /// Canonical user of the current bearer token, role populated.
    async fn me(&self) -> AuthResult<User>;

    /// Company profiles visible to the current bearer token.
    async fn company_profiles(&self) -> AuthResult<Vec<CompanyProfile>>;

    async fn forgot_password(&self, email: &str) -> AuthResult<()>;

    async fn reset_password(
        &self,
        code: &str,
        password: &str,
        password_confirmation: &str,
    ) -> AuthResult<AuthResponse>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    code: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Message of a backend error payload (`{error: {message}}`), if any.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    envelope
        .error
        .and_then(|e| e.message)
        .or(envelope.message)
        .filter(|m| !m.trim().is_empty())
}

/// [`AuthBackend`] over the Strapi users-permissions REST API.
#[derive(Clone)]
pub struct StrapiBackend {
    api: ApiClient,
}

impl StrapiBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn credential_exchange<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> AuthResult<AuthResponse> {
        let resp = self
            .api
            .send(self.api.request(Method::POST, path).json(body))
            .await?;
        let resp = reject_credentials(resp, fallback).await?;
        resp.json().await.map_err(transport_error)
    }
}

/// Map a non-success credential response to [`AuthError::Credential`].
async fn reject_credentials(resp: Response, fallback: &str) -> AuthResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
    tracing::info!(%status, "backend rejected credentials");
    Err(AuthError::credential(message))
}

#[async_trait]
impl AuthBackend for StrapiBackend {
    async fn login(&self, identifier: &str, password: &str) -> AuthResult<AuthResponse> {
        self.credential_exchange(LOGIN_PATH, &LoginRequest { identifier, password }, "Login failed")
            .await
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> AuthResult<AuthResponse> {
        self.credential_exchange(
            REGISTER_PATH,
            &RegisterRequest {
                username,
                email,
                password,
            },
            "Registration failed",
        )
        .await
    }

    async fn me(&self) -> AuthResult<User> {
        self.api.get_json(ME_PATH).await
    }

    async fn company_profiles(&self) -> AuthResult<Vec<CompanyProfile>> {
        let collection: Collection<CompanyProfile> = self.api.get_json(COMPANY_PROFILES_PATH).await?;
        Ok(collection.data)
    }

    async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        let resp = self
            .api
            .send(
                self.api
                    .request(Method::POST, FORGOT_PASSWORD_PATH)
                    .json(&ForgotPasswordRequest { email }),
            )
            .await?;
        reject_credentials(resp, "Password reset request failed").await?;
        Ok(())
    }

    async fn reset_password(
        &self,
        code: &str,
        password: &str,
        password_confirmation: &str,
    ) -> AuthResult<AuthResponse> {
        self.credential_exchange(
            RESET_PASSWORD_PATH,
            &ResetPasswordRequest {
                code,
                password,
                password_confirmation,
            },
            "Password reset failed",
        )
        .await
    }
}
