//! `kurum360-auth` — pure identity model and authorization policy.
//!
//! This crate is intentionally decoupled from HTTP and storage: the edge
//! interceptor and the component guard both feed it a [`SessionSnapshot`] and
//! act on the returned [`Decision`].

pub mod authorize;
pub mod capabilities;
pub mod roles;
pub mod routes;
pub mod snapshot;
pub mod user;

pub use authorize::{Decision, Requirement, authorize};
pub use roles::{Role, RoleType};
pub use snapshot::SessionSnapshot;
pub use user::{CompanyProfile, Media, User};
