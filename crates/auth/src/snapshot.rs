use serde::Deserialize;

use crate::routes;
use crate::{Role, RoleType, User};

/// The slice of session state that authorization decisions look at.
///
/// Built either from the live session ([`SessionSnapshot::from_user`]) or from
/// the request cookies ([`SessionSnapshot::from_cookies`]); both feed the same
/// [`authorize`](crate::authorize) function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub role: Option<RoleType>,
    pub ahi_ik_member: bool,
}

/// Lenient view of the `user` cookie: only the fields policy needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CookieUser {
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    ahi_ik_member: Option<bool>,
}

impl SessionSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Snapshot of the in-memory session: authenticated iff a user is loaded.
    pub fn from_user(user: Option<&User>) -> Self {
        match user {
            Some(user) => Self {
                authenticated: true,
                role: user.role_type(),
                ahi_ik_member: user.has_ahi_ik_flag(),
            },
            None => Self::anonymous(),
        }
    }

    /// Snapshot of the request cookies: authenticated iff a non-empty token
    /// cookie is present. A missing or malformed `user` cookie leaves the role
    /// unset rather than failing.
    pub fn from_cookies(token: Option<&str>, user_json: Option<&str>) -> Self {
        let authenticated = token.is_some_and(|t| !t.trim().is_empty());

        let cookie_user = user_json.and_then(|raw| match serde_json::from_str::<CookieUser>(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("ignoring malformed user cookie: {e}");
                None
            }
        });

        match cookie_user {
            Some(user) => Self {
                authenticated,
                role: user.role.map(|r| r.kind),
                ahi_ik_member: user.ahi_ik_member == Some(true),
            },
            None => Self {
                authenticated,
                ..Self::anonymous()
            },
        }
    }

    pub fn is_employee(&self) -> bool {
        self.role == Some(RoleType::Employee)
    }

    pub fn is_company(&self) -> bool {
        self.role == Some(RoleType::Authenticated)
    }

    pub fn is_worker(&self) -> bool {
        self.role == Some(RoleType::Worker)
    }

    /// A company is AHİ-İK only with the explicit opt-in flag.
    pub fn is_ahi_ik(&self) -> bool {
        self.is_company() && self.ahi_ik_member
    }

    /// Landing route for this actor. Total over every role.
    pub fn dashboard_url(&self) -> &'static str {
        routes::dashboard_for(self.role)
    }
}
