//! Fixed route table shared by both gate layers.

use crate::RoleType;

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const EMPLOYEE_DASHBOARD: &str = "/dashboard";
pub const COMPANY_DASHBOARD: &str = "/company-dashboard";
pub const WORKER_DASHBOARD: &str = "/worker-dashboard";

/// Paths served without any session check.
pub const PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/_next",
    "/static",
    "/images",
    "/favicon.ico",
    "/api/public",
];

/// Extended HR (AHİ-İK) module: workers and entitled companies only.
pub const EXTENDED_HR_PREFIXES: &[&str] = &[
    "/digital-hr",
    "/workers",
    "/leave-requests",
    "/shift-planning",
    "/worker-dashboard",
];

/// `prefix` matches the exact path or the path followed by a `/` segment.
pub fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|p| has_prefix(path, p))
}

pub fn is_extended_hr(path: &str) -> bool {
    EXTENDED_HR_PREFIXES.iter().any(|p| has_prefix(path, p))
}

/// Landing route per role; unmapped or anonymous actors go to the public home.
pub fn dashboard_for(role: Option<RoleType>) -> &'static str {
    match role {
        Some(RoleType::Employee) => EMPLOYEE_DASHBOARD,
        Some(RoleType::Authenticated) => COMPANY_DASHBOARD,
        Some(RoleType::Worker) => WORKER_DASHBOARD,
        Some(RoleType::Unknown) | None => HOME,
    }
}

/// Login URL carrying the originally requested path for redirect-back.
pub fn login_with_return(from: &str) -> String {
    format!("{LOGIN}?from={}", urlencoding::encode(from))
}
