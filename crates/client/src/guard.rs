use shared_types::{Role, Session};

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

/// Outcome of a route-guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Allow iff a session exists and holds at least one of `required`.
///
/// Pure; call it on every render of a guarded view rather than caching it.
pub fn authorize(required: &[Role], session: Option<&Session>) -> Access {
    match session {
        Some(s) if required.iter().any(|r| s.has_role(*r)) => Access::Allow,
        _ => Access::Redirect(LOGIN_ROUTE),
    }
}

/// Dashboard path for a role.
pub fn dashboard_route(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::Donor => "/donor/dashboard",
        Role::Patient => "/patient/dashboard",
    }
}

/// Where to go after sign-in: Admin, then Donor, then Patient, else home.
pub fn landing_route(session: Option<&Session>) -> &'static str {
    session
        .and_then(|s| Role::ALL.into_iter().find(|r| s.has_role(*r)))
        .map(dashboard_route)
        .unwrap_or(HOME_ROUTE)
}
