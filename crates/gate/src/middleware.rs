use std::borrow::Cow;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use kurum360_auth::{Decision, Requirement, SessionSnapshot, authorize, routes};

use crate::context::SessionContext;

const TOKEN_COOKIE: &str = "token";
const USER_COOKIE: &str = "user";

/// What the edge does with one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeAction {
    Pass,
    Redirect(String),
}

/// Edge policy for a request path and cookie snapshot. Pure.
///
/// Order: public prefixes, the root path, the token check, then the
/// restricted-module gate. A redirect to the root that would loop (actor
/// without a mapped dashboard) passes instead.
pub fn edge_action(path: &str, snapshot: &SessionSnapshot) -> EdgeAction {
    if routes::is_public(path) {
        return EdgeAction::Pass;
    }

    if path == routes::HOME {
        if !snapshot.authenticated {
            return EdgeAction::Redirect(routes::LOGIN.to_string());
        }
        return match snapshot.dashboard_url() {
            routes::HOME => EdgeAction::Pass,
            dashboard => EdgeAction::Redirect(dashboard.to_string()),
        };
    }

    if !snapshot.authenticated {
        return EdgeAction::Redirect(routes::login_with_return(path));
    }

    let Some(requirement) = Requirement::for_path(path) else {
        return EdgeAction::Pass;
    };

    match authorize(snapshot, &requirement) {
        Decision::Allow => EdgeAction::Pass,
        Decision::Login => EdgeAction::Redirect(routes::login_with_return(path)),
        Decision::Redirect(to) => EdgeAction::Redirect(to.to_string()),
    }
}

/// Build the snapshot from the `token` and `user` cookies.
pub fn snapshot_from_jar(jar: &CookieJar) -> SessionSnapshot {
    let token = jar.get(TOKEN_COOKIE).map(|c| c.value().to_owned());
    let user = jar.get(USER_COOKIE).map(|c| user_cookie_json(c.value()));

    SessionSnapshot::from_cookies(token.as_deref(), user.as_deref())
}

/// The `user` cookie is JSON, possibly still percent-encoded.
fn user_cookie_json(raw: &str) -> Cow<'_, str> {
    if raw.trim_start().starts_with('{') {
        return Cow::Borrowed(raw);
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Axum middleware enforcing [`edge_action`].
///
/// Requests that pass carry a [`SessionContext`] extension.
pub async fn edge_gate(jar: CookieJar, mut req: Request, next: Next) -> Response {
    let snapshot = snapshot_from_jar(&jar);
    let path = req.uri().path().to_owned();

    match edge_action(&path, &snapshot) {
        EdgeAction::Pass => {
            req.extensions_mut().insert(SessionContext::new(snapshot));
            next.run(req).await
        }
        EdgeAction::Redirect(to) => {
            tracing::debug!(path = path.as_str(), to = to.as_str(), "edge redirect");
            Redirect::temporary(&to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
    use kurum360_auth::RoleType;

    fn snap(role: Option<RoleType>, ahi_ik_member: bool) -> SessionSnapshot {
        SessionSnapshot {
            authenticated: true,
            role,
            ahi_ik_member,
        }
    }

    fn redirect(to: &str) -> EdgeAction {
        EdgeAction::Redirect(to.to_string())
    }

    #[test]
    fn public_paths_bypass_everything() {
        let anon = SessionSnapshot::anonymous();
        assert_eq!(edge_action("/login", &anon), EdgeAction::Pass);
        assert_eq!(edge_action("/reset-password", &anon), EdgeAction::Pass);
        assert_eq!(edge_action("/_next/static/app.js", &anon), EdgeAction::Pass);
        assert_eq!(edge_action("/api/public/jobs", &anon), EdgeAction::Pass);
    }

    #[test]
    fn root_routes_by_role() {
        assert_eq!(edge_action("/", &SessionSnapshot::anonymous()), redirect("/login"));
        assert_eq!(
            edge_action("/", &snap(Some(RoleType::Employee), false)),
            redirect(routes::EMPLOYEE_DASHBOARD)
        );
        assert_eq!(
            edge_action("/", &snap(Some(RoleType::Authenticated), false)),
            redirect(routes::COMPANY_DASHBOARD)
        );
        assert_eq!(edge_action("/", &snap(None, false)), EdgeAction::Pass);
    }

    #[test]
    fn missing_token_keeps_requested_path() {
        assert_eq!(
            edge_action("/workers/list", &SessionSnapshot::anonymous()),
            redirect("/login?from=%2Fworkers%2Flist")
        );
        assert_eq!(
            edge_action("/job-listings", &SessionSnapshot::anonymous()),
            redirect("/login?from=%2Fjob-listings")
        );
    }

    #[test]
    fn restricted_module_gate() {
        let company = snap(Some(RoleType::Authenticated), false);
        let ahi_ik = snap(Some(RoleType::Authenticated), true);
        let worker = snap(Some(RoleType::Worker), false);
        let employee = snap(Some(RoleType::Employee), true);

        assert_eq!(edge_action("/digital-hr", &company), redirect(routes::COMPANY_DASHBOARD));
        assert_eq!(edge_action("/digital-hr", &ahi_ik), EdgeAction::Pass);
        assert_eq!(edge_action("/shift-planning/week", &worker), EdgeAction::Pass);
        assert_eq!(edge_action("/workers", &employee), redirect(routes::HOME));
    }

    #[test]
    fn token_without_user_cookie_reaches_ordinary_pages() {
        assert_eq!(edge_action("/job-listings", &snap(None, false)), EdgeAction::Pass);
    }

    #[test]
    fn jar_snapshot_accepts_encoded_and_raw_user_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("token=jwt; user=%7B%22role%22%3A%7B%22type%22%3A%22worker%22%7D%7D"),
        );
        let snapshot = snapshot_from_jar(&CookieJar::from_headers(&headers));
        assert!(snapshot.authenticated);
        assert_eq!(snapshot.role, Some(RoleType::Worker));

        assert_eq!(user_cookie_json(r#"{"role":null}"#), r#"{"role":null}"#);
    }

    #[test]
    fn jar_without_token_is_anonymous() {
        let snapshot = snapshot_from_jar(&CookieJar::new());
        assert_eq!(snapshot, SessionSnapshot::anonymous());
    }
}
