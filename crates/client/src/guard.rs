//! Component-level route guard.
//!
//! Runs after the session has hydrated, against the in-memory user. It never
//! hides content: children stay visible and a redirect is issued alongside.

use kurum360_auth::{Decision, Requirement, RoleType, SessionSnapshot, authorize, routes};

use crate::session::AuthService;

/// Client-side navigation sink.
pub trait Navigator {
    fn navigate(&self, to: &str);
}

/// Result of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    /// Always `true`; the guard has no loading or denied state.
    pub children_visible: bool,
    pub redirect: Option<String>,
}

impl GuardOutcome {
    fn from_decision(decision: Decision) -> Self {
        let redirect = match decision {
            Decision::Allow => None,
            Decision::Login => Some(routes::LOGIN.to_string()),
            Decision::Redirect(to) => Some(to.to_string()),
        };
        Self {
            children_visible: true,
            redirect,
        }
    }
}

/// Guard wrapping a page subtree.
///
/// ```ignore
/// let mut guard = RoleGuard::new().allow([RoleType::Authenticated]).require_ahi_ik();
/// guard.mount(&auth.snapshot(), &navigator);
/// ```
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Option<Vec<RoleType>>,
    require_ahi_ik: bool,
    last: Option<SessionSnapshot>,
}

impl Default for RoleGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleGuard {
    /// Guard requiring only a present user.
    pub fn new() -> Self {
        Self {
            allowed: None,
            require_ahi_ik: false,
            last: None,
        }
    }

    pub fn allow(mut self, roles: impl IntoIterator<Item = RoleType>) -> Self {
        self.allowed = Some(roles.into_iter().collect());
        self
    }

    pub fn require_ahi_ik(mut self) -> Self {
        self.require_ahi_ik = true;
        self
    }

    pub fn requirement(&self) -> Requirement {
        Requirement::Roles {
            allowed: self.allowed.clone(),
            require_ahi_ik: self.require_ahi_ik,
        }
    }

    /// Evaluate without navigating.
    pub fn evaluate(&self, snapshot: &SessionSnapshot) -> GuardOutcome {
        GuardOutcome::from_decision(authorize(snapshot, &self.requirement()))
    }

    /// First evaluation; always runs.
    pub fn mount(&mut self, snapshot: &SessionSnapshot, navigator: &dyn Navigator) -> GuardOutcome {
        self.last = Some(*snapshot);
        let outcome = self.evaluate(snapshot);
        if let Some(to) = &outcome.redirect {
            tracing::debug!(to = to.as_str(), "guard redirect");
            navigator.navigate(to);
        }
        outcome
    }

    /// Re-evaluate when the session changed since the last run.
    /// Returns `None` when nothing changed.
    pub fn update(&mut self, snapshot: &SessionSnapshot, navigator: &dyn Navigator) -> Option<GuardOutcome> {
        if self.last.as_ref() == Some(snapshot) {
            return None;
        }
        Some(self.mount(snapshot, navigator))
    }

    pub fn mount_session(&mut self, auth: &AuthService, navigator: &dyn Navigator) -> GuardOutcome {
        self.mount(&auth.snapshot(), navigator)
    }

    pub fn update_session(&mut self, auth: &AuthService, navigator: &dyn Navigator) -> Option<GuardOutcome> {
        self.update(&auth.snapshot(), navigator)
    }
}
