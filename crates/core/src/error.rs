//! Authentication error model.

use thiserror::Error;

/// Result type used by every session lifecycle operation.
pub type AuthResult<T> = Result<T, AuthError>;

/// Failure of an authentication or session operation.
///
/// Variants carry plain strings so the error stays `Clone` and can be handed to
/// every caller waiting on a shared refresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend rejected the identifier/password (or registration payload).
    ///
    /// The message is forwarded verbatim from the backend when it sent one.
    #[error("{0}")]
    Credential(String),

    /// No token is held, or the backend refused the current token.
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// Transport-level failure (connect, timeout, broken body).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a payload we could not decode.
    #[error("unexpected backend payload: {0}")]
    Decode(String),

    /// The durable session store failed.
    #[error("session storage error: {0}")]
    Storage(String),

    /// Input rejected locally before any request was made.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AuthError {
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    pub fn session_expired(msg: impl Into<String>) -> Self {
        Self::SessionExpired(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The backend (or the absence of a token) definitively refused the session.
    ///
    /// Transport, decode and storage failures are not rejections.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Credential(_) | Self::SessionExpired(_))
    }
}
