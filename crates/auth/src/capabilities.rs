//! Role resolver: capability flags derived from the current user.
//!
//! Every predicate goes through [`SessionSnapshot`] so call sites cannot drift
//! from what the route gates decide.

use crate::{CompanyProfile, SessionSnapshot, User};

pub fn is_employee(user: Option<&User>) -> bool {
    SessionSnapshot::from_user(user).is_employee()
}

pub fn is_company(user: Option<&User>) -> bool {
    SessionSnapshot::from_user(user).is_company()
}

pub fn is_worker(user: Option<&User>) -> bool {
    SessionSnapshot::from_user(user).is_worker()
}

/// Company role AND explicit `ahiIkMember == true`.
pub fn is_ahi_ik(user: Option<&User>) -> bool {
    SessionSnapshot::from_user(user).is_ahi_ik()
}

pub fn dashboard_url(user: Option<&User>) -> &'static str {
    SessionSnapshot::from_user(user).dashboard_url()
}

/// Blocked accounts still authenticate; downstream features check this flag.
pub fn is_blocked(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.blocked)
}

pub fn is_company_frozen(profile: Option<&CompanyProfile>) -> bool {
    profile.is_some_and(|p| p.is_frozen == Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, RoleType, routes};
    use kurum360_core::{DocumentId, EntityId};
    use proptest::prelude::*;

    fn user(kind: Option<RoleType>, ahi_ik_member: Option<bool>) -> User {
        User {
            id: EntityId::new(1),
            document_id: DocumentId::new("u1"),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            confirmed: true,
            blocked: false,
            ahi_ik_member,
            role: kind.map(|k| Role::new(k.as_str(), k)),
        }
    }

    fn role_type() -> impl Strategy<Value = Option<RoleType>> {
        prop_oneof![
            Just(None),
            Just(Some(RoleType::Employee)),
            Just(Some(RoleType::Authenticated)),
            Just(Some(RoleType::Worker)),
            Just(Some(RoleType::Unknown)),
        ]
    }

    proptest! {
        #[test]
        fn dashboard_url_is_total(kind in role_type(), flag in proptest::option::of(any::<bool>())) {
            let u = user(kind, flag);
            let url = dashboard_url(Some(&u));
            prop_assert!(url.starts_with('/'));
            prop_assert!(!url.is_empty());
        }

        #[test]
        fn ahi_ik_requires_company_and_flag(kind in role_type(), flag in proptest::option::of(any::<bool>())) {
            let u = user(kind, flag);
            prop_assert_eq!(
                is_ahi_ik(Some(&u)),
                is_company(Some(&u)) && flag == Some(true)
            );
        }
    }

    #[test]
    fn anonymous_dashboard_is_home() {
        assert_eq!(dashboard_url(None), routes::HOME);
        assert!(!is_ahi_ik(None));
    }

    #[test]
    fn workers_and_employees_are_never_ahi_ik() {
        for kind in [RoleType::Worker, RoleType::Employee] {
            let u = user(Some(kind), Some(true));
            assert!(!is_ahi_ik(Some(&u)));
        }
    }

    #[test]
    fn dashboards_per_role() {
        assert_eq!(dashboard_url(Some(&user(Some(RoleType::Employee), None))), routes::EMPLOYEE_DASHBOARD);
        assert_eq!(dashboard_url(Some(&user(Some(RoleType::Authenticated), Some(true)))), routes::COMPANY_DASHBOARD);
        assert_eq!(dashboard_url(Some(&user(Some(RoleType::Worker), None))), routes::WORKER_DASHBOARD);
        assert_eq!(dashboard_url(Some(&user(Some(RoleType::Unknown), None))), routes::HOME);
    }

    #[test]
    fn frozen_only_with_explicit_flag() {
        let profile = |frozen: Option<bool>| CompanyProfile {
            id: EntityId::new(4),
            document_id: DocumentId::new("cp-4"),
            company_name: "Acme".to_string(),
            logo: None,
            email: "hr@acme.com".to_string(),
            is_frozen: frozen,
            extra: Default::default(),
        };
        assert!(is_company_frozen(Some(&profile(Some(true)))));
        assert!(!is_company_frozen(Some(&profile(Some(false)))));
        assert!(!is_company_frozen(Some(&profile(None))));
        assert!(!is_company_frozen(None));
    }

    #[test]
    fn blocked_flag_is_reported() {
        let mut u = user(Some(RoleType::Authenticated), None);
        assert!(!is_blocked(Some(&u)));
        u.blocked = true;
        assert!(is_blocked(Some(&u)));
    }
}
