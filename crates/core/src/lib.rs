//! `kurum360-core` — shared building blocks for the session/authorization core.
//!
//! This crate holds no IO: only the error model and backend identifiers.

pub mod error;
pub mod id;

pub use error::{AuthError, AuthResult};
pub use id::{DocumentId, EntityId};
