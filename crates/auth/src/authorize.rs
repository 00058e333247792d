//! The single authorization decision used by both route gates.

use crate::routes;
use crate::{RoleType, SessionSnapshot};

/// What a route demands of the current actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated actor.
    Authenticated,
    /// Optional role allow-list, optionally also the AHİ-İK entitlement.
    Roles {
        allowed: Option<Vec<RoleType>>,
        require_ahi_ik: bool,
    },
    /// Extended HR module: workers or AHİ-İK companies.
    ExtendedHr,
}

impl Requirement {
    /// Requirement the edge applies to a request path; `None` for public paths.
    pub fn for_path(path: &str) -> Option<Self> {
        if routes::is_public(path) {
            None
        } else if routes::is_extended_hr(path) {
            Some(Self::ExtendedHr)
        } else {
            Some(Self::Authenticated)
        }
    }
}

/// Outcome of an authorization check. There is no "denied" state: every
/// refusal points somewhere the actor may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Not authenticated; the caller decides whether to append a return path.
    Login,
    Redirect(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Authorize a snapshot against a requirement.
///
/// - No IO
/// - No panics
pub fn authorize(snapshot: &SessionSnapshot, requirement: &Requirement) -> Decision {
    if !snapshot.authenticated {
        return Decision::Login;
    }

    match requirement {
        Requirement::Authenticated => Decision::Allow,
        Requirement::Roles {
            allowed,
            require_ahi_ik,
        } => {
            if let Some(allowed) = allowed {
                let permitted = snapshot.role.is_some_and(|r| allowed.contains(&r));
                if !permitted {
                    return Decision::Redirect(snapshot.dashboard_url());
                }
            }
            if *require_ahi_ik && !snapshot.is_ahi_ik() {
                return Decision::Redirect(routes::COMPANY_DASHBOARD);
            }
            Decision::Allow
        }
        Requirement::ExtendedHr => {
            if snapshot.is_worker() || snapshot.is_ahi_ik() {
                Decision::Allow
            } else if snapshot.is_company() {
                Decision::Redirect(routes::COMPANY_DASHBOARD)
            } else {
                Decision::Redirect(routes::HOME)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(role: Option<RoleType>, ahi_ik_member: bool) -> SessionSnapshot {
        SessionSnapshot {
            authenticated: true,
            role,
            ahi_ik_member,
        }
    }

    #[test]
    fn anonymous_always_goes_to_login() {
        let anon = SessionSnapshot::anonymous();
        assert_eq!(authorize(&anon, &Requirement::Authenticated), Decision::Login);
        assert_eq!(authorize(&anon, &Requirement::ExtendedHr), Decision::Login);
    }

    #[test]
    fn extended_hr_admits_workers_and_entitled_companies() {
        let worker = snap(Some(RoleType::Worker), false);
        let ahi_ik = snap(Some(RoleType::Authenticated), true);
        assert!(authorize(&worker, &Requirement::ExtendedHr).is_allowed());
        assert!(authorize(&ahi_ik, &Requirement::ExtendedHr).is_allowed());
    }

    #[test]
    fn extended_hr_sends_plain_company_to_its_dashboard() {
        let company = snap(Some(RoleType::Authenticated), false);
        assert_eq!(
            authorize(&company, &Requirement::ExtendedHr),
            Decision::Redirect(routes::COMPANY_DASHBOARD)
        );
    }

    #[test]
    fn extended_hr_sends_others_home() {
        let employee = snap(Some(RoleType::Employee), true);
        assert_eq!(authorize(&employee, &Requirement::ExtendedHr), Decision::Redirect(routes::HOME));
        let unknown = snap(None, false);
        assert_eq!(authorize(&unknown, &Requirement::ExtendedHr), Decision::Redirect(routes::HOME));
    }

    #[test]
    fn role_allow_list_redirects_to_own_dashboard() {
        let employee = snap(Some(RoleType::Employee), false);
        let req = Requirement::Roles {
            allowed: Some(vec![RoleType::Authenticated]),
            require_ahi_ik: false,
        };
        assert_eq!(authorize(&employee, &req), Decision::Redirect(routes::EMPLOYEE_DASHBOARD));
    }

    #[test]
    fn ahi_ik_requirement_redirects_to_company_dashboard() {
        let company = snap(Some(RoleType::Authenticated), false);
        let req = Requirement::Roles {
            allowed: Some(vec![RoleType::Authenticated]),
            require_ahi_ik: true,
        };
        assert_eq!(authorize(&company, &req), Decision::Redirect(routes::COMPANY_DASHBOARD));

        let entitled = snap(Some(RoleType::Authenticated), true);
        assert!(authorize(&entitled, &req).is_allowed());
    }

    #[test]
    fn path_requirements() {
        assert_eq!(Requirement::for_path("/login"), None);
        assert_eq!(Requirement::for_path("/digital-hr"), Some(Requirement::ExtendedHr));
        assert_eq!(Requirement::for_path("/workers/list"), Some(Requirement::ExtendedHr));
        assert_eq!(Requirement::for_path("/job-listings"), Some(Requirement::Authenticated));
    }
}
