//! Path construction: namespace prefixes, sign-in targets and legacy redirects.
//!
//! Client pages live under two prefixes, `/client` for the business itself
//! and `/professional/{clientId}` for a professional viewing that client.
//! Every link builder goes through [`resolve_base_path`]; pages never pick
//! a prefix themselves.

use crate::session::AccountRole;

/// Historical top-level paths and their `/client/...` replacements.
pub const LEGACY_REDIRECTS: &[(&str, &str)] = &[
    ("/dashboard", "/client/home"),
    ("/company", "/client/company"),
    ("/documents", "/client/documents"),
    ("/tasks", "/client/tasks"),
    ("/compliances", "/client/compliances"),
    ("/legal-services", "/client/legal-services"),
    ("/payments", "/client/payments"),
    ("/messages", "/client/messages"),
    ("/settings", "/client/settings"),
];

pub const CLIENT_SIGN_IN: &str = "/client/auth";
pub const PROFESSIONAL_SIGN_IN: &str = "/professional/auth";
pub const CLIENT_ONBOARDING: &str = "/client/onboarding";
pub const PROFESSIONAL_CLIENTS: &str = "/professional/clients";

/// Replacement for a legacy top-level path, if `path` is one.
pub fn legacy_redirect(path: &str) -> Option<&'static str> {
    LEGACY_REDIRECTS
        .iter()
        .find(|(from, _)| *from == path)
        .map(|(_, to)| *to)
}

/// Sign-in page for a role. Unknown roles go to the professional sign-in.
pub fn sign_in_path(role: Option<AccountRole>) -> &'static str {
    match role {
        Some(AccountRole::Business) => CLIENT_SIGN_IN,
        Some(AccountRole::Professional) | None => PROFESSIONAL_SIGN_IN,
    }
}

/// Entry point of the onboarding flow a role must finish before its
/// dashboard opens. Professionals have no blocking flow; their onboarding
/// page is reachable but optional.
pub fn onboarding_path(role: AccountRole) -> Option<&'static str> {
    match role {
        AccountRole::Business => Some(CLIENT_ONBOARDING),
        AccountRole::Professional => None,
    }
}

/// Prefix under which client pages are addressed in the current context.
///
/// An empty client id counts as no impersonation.
pub fn resolve_base_path(role: AccountRole, impersonated_client_id: Option<&str>) -> String {
    match (role, impersonated_client_id.filter(|id| !id.is_empty())) {
        (AccountRole::Business, _) => "/client".to_string(),
        (AccountRole::Professional, Some(id)) => format!("/professional/{id}"),
        (AccountRole::Professional, None) => "/professional".to_string(),
    }
}

/// Join a base prefix and a page slug.
pub fn link_to(base: &str, slug: &str) -> String {
    let base = base.trim_end_matches('/');
    let slug = slug.trim_start_matches('/');
    if slug.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{slug}")
    }
}
