//! Route resolution — concrete path + session → page, layout and guard outcome.
//!
//! Evaluation order: legacy redirects, structural match, impersonation,
//! role guard, onboarding gate. Guard failures and unmatched paths are
//! ordinary outcomes, never errors.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::layout::{LayoutVariant, layout_for};
use super::matcher::{best_match, normalize_path};
use super::paths::{legacy_redirect, onboarding_path, sign_in_path};
use super::table::{Audience, CLIENT_ID_PARAM, ROUTES, RouteEntry, View};
use crate::session::{AccountRole, Session};

/// Per-resolution navigation state, derived from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
    pub current_path: String,
    pub route_params: BTreeMap<String, String>,
    pub is_impersonating: bool,
}

impl NavigationContext {
    /// The client being viewed, when impersonating.
    pub fn impersonated_client_id(&self) -> Option<&str> {
        if !self.is_impersonating {
            return None;
        }
        self.route_params.get(CLIENT_ID_PARAM).map(String::as_str)
    }
}

/// Why a guarded route refused the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardFailure {
    Unauthenticated { required: AccountRole },
    WrongRole {
        required: AccountRole,
        actual: AccountRole,
    },
}

/// How the client should apply a redirect to its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectKind {
    /// Replace the current history entry.
    Replace,
    /// Push a new history entry.
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    Legacy,
    Guard(GuardFailure),
    OnboardingRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    pub kind: RedirectKind,
    pub reason: RedirectReason,
}

/// A page that renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRoute {
    pub view: View,
    pub layout: LayoutVariant,
    /// Role the route's guard demanded, `None` for public routes.
    pub guard: Option<AccountRole>,
    pub context: NavigationContext,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Render(RenderedRoute),
    Redirect(Redirect),
    NotFound(NavigationContext),
}

impl Resolution {
    /// The view that renders, including the not-found view.
    pub fn view(&self) -> Option<View> {
        match self {
            Self::Render(route) => Some(route.view),
            Self::NotFound(_) => Some(View::NotFound),
            Self::Redirect(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }
}

/// Resolve a path against the application's route table.
pub fn resolve(path: &str, session: &Session) -> Resolution {
    resolve_with(ROUTES, path, session)
}

/// Resolve a path against an arbitrary table.
pub fn resolve_with(table: &[RouteEntry], raw_path: &str, session: &Session) -> Resolution {
    let path = normalize_path(raw_path);

    if let Some(target) = legacy_redirect(&path) {
        debug!(from = %path, to = target, "Legacy path redirect");
        return Resolution::Redirect(Redirect {
            to: target.to_string(),
            kind: RedirectKind::Replace,
            reason: RedirectReason::Legacy,
        });
    }

    let Some(matched) = best_match(table, &path) else {
        debug!(path = %path, "No route matched");
        return Resolution::NotFound(NavigationContext {
            current_path: path,
            ..Default::default()
        });
    };
    let entry = &table[matched.index];

    let is_impersonating = entry.audience == Audience::Professional
        && entry.view.is_client_page()
        && matched
            .params
            .get(CLIENT_ID_PARAM)
            .is_some_and(|id| !id.is_empty());

    let context = NavigationContext {
        current_path: path,
        route_params: matched.params,
        is_impersonating,
    };

    let guard = if entry.guarded {
        entry.audience.required_role()
    } else {
        None
    };

    if let Some(required) = guard {
        if let Err(failure) = check_guard(required, session) {
            debug!(path = %context.current_path, ?failure, "Guard refused session");
            return Resolution::Redirect(Redirect {
                to: sign_in_path(Some(required)).to_string(),
                kind: RedirectKind::Push,
                reason: RedirectReason::Guard(failure),
            });
        }
        let gate = onboarding_path(required)
            .filter(|_| !session.onboarding_complete && !entry.view.is_onboarding());
        if let Some(entry_point) = gate {
            debug!(path = %context.current_path, "Onboarding not complete");
            return Resolution::Redirect(Redirect {
                to: entry_point.to_string(),
                kind: RedirectKind::Push,
                reason: RedirectReason::OnboardingRequired,
            });
        }
    }

    Resolution::Render(RenderedRoute {
        view: entry.view,
        layout: layout_for(entry.view, entry.audience),
        guard,
        context,
    })
}

/// Check that the session is signed in with the required role.
pub fn check_guard(required: AccountRole, session: &Session) -> Result<(), GuardFailure> {
    if session.has_role(required) {
        return Ok(());
    }
    match session.role {
        Some(actual) if session.is_authenticated() => {
            Err(GuardFailure::WrongRole { required, actual })
        }
        _ => Err(GuardFailure::Unauthenticated { required }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::paths::LEGACY_REDIRECTS;
    use crate::routing::table::CLIENT_PAGES;
    use crate::session::Identity;

    fn session(role: AccountRole) -> Session {
        Session::signed_in(Identity::from_email("someone@example.com"), role, true)
    }

    fn rendered(resolution: Resolution) -> RenderedRoute {
        match resolution {
            Resolution::Render(route) => route,
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn legacy_paths_redirect_regardless_of_session() {
        let sessions = [
            Session::anonymous(),
            session(AccountRole::Business),
            session(AccountRole::Professional),
        ];
        for s in &sessions {
            for (from, to) in LEGACY_REDIRECTS {
                let redirect = resolve(from, s).redirect().cloned().unwrap();
                assert_eq!(redirect.to, *to);
                assert_eq!(redirect.kind, RedirectKind::Replace);
                assert_eq!(redirect.reason, RedirectReason::Legacy);
            }
        }
        assert_eq!(
            resolve("/dashboard", &Session::anonymous()).redirect().unwrap().to,
            "/client/home"
        );
        assert_eq!(
            resolve("/messages/", &Session::anonymous()).redirect().unwrap().to,
            "/client/messages"
        );
    }

    #[test]
    fn impersonated_pages_match_client_pages() {
        let pro = session(AccountRole::Professional);
        let business = session(AccountRole::Business);
        for page in CLIENT_PAGES {
            let own = rendered(resolve(&format!("/client/{}", page.slug), &business));
            let imp = rendered(resolve(&format!("/professional/acme-01/{}", page.slug), &pro));

            assert_eq!(own.view, imp.view);
            assert_eq!(imp.layout, LayoutVariant::ClientSidebar);
            assert_eq!(own.layout, LayoutVariant::ClientSidebar);
            assert!(imp.context.is_impersonating);
            assert!(!own.context.is_impersonating);
            assert_eq!(imp.context.impersonated_client_id(), Some("acme-01"));
            assert_eq!(imp.guard, Some(AccountRole::Professional));
            assert_eq!(own.guard, Some(AccountRole::Business));
        }
    }

    #[test]
    fn business_on_professional_route_goes_to_professional_sign_in() {
        let business = session(AccountRole::Business);
        for path in ["/professional/home", "/professional/team", "/professional/c-1/tasks"] {
            let redirect = resolve(path, &business).redirect().cloned().unwrap();
            assert_eq!(redirect.to, "/professional/auth");
            assert_eq!(
                redirect.reason,
                RedirectReason::Guard(GuardFailure::WrongRole {
                    required: AccountRole::Professional,
                    actual: AccountRole::Business,
                })
            );
        }
    }

    #[test]
    fn professional_on_client_route_goes_to_client_sign_in() {
        let redirect = resolve("/client/payments", &session(AccountRole::Professional))
            .redirect()
            .cloned()
            .unwrap();
        assert_eq!(redirect.to, "/client/auth");
        assert_eq!(redirect.kind, RedirectKind::Push);
    }

    #[test]
    fn anonymous_is_sent_to_required_role_sign_in() {
        let anon = Session::anonymous();
        assert_eq!(
            resolve("/client/home", &anon).redirect().unwrap().reason,
            RedirectReason::Guard(GuardFailure::Unauthenticated {
                required: AccountRole::Business
            })
        );
        assert_eq!(resolve("/client/home", &anon).redirect().unwrap().to, "/client/auth");
        assert_eq!(
            resolve("/professional/clients", &anon).redirect().unwrap().to,
            "/professional/auth"
        );
    }

    #[test]
    fn unmatched_path_is_not_found_without_guard() {
        let resolution = resolve("/this/does/not/exist", &Session::anonymous());
        assert_eq!(resolution.view(), Some(View::NotFound));
        match resolution {
            Resolution::NotFound(ctx) => {
                assert_eq!(ctx.current_path, "/this/does/not/exist");
                assert!(!ctx.is_impersonating);
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn public_routes_render_for_anyone() {
        let route = rendered(resolve("/client/auth", &Session::anonymous()));
        assert_eq!(route.view, View::ClientAuth);
        assert_eq!(route.layout, LayoutVariant::Public);
        assert_eq!(route.guard, None);

        let route = rendered(resolve("/", &Session::anonymous()));
        assert_eq!(route.view, View::Landing);
    }

    #[test]
    fn professional_static_pages_beat_impersonation_params() {
        let pro = session(AccountRole::Professional);
        let route = rendered(resolve("/professional/clients", &pro));
        assert_eq!(route.view, View::ProfessionalClients);
        assert_eq!(route.layout, LayoutVariant::ProfessionalSidebar);
        assert!(!route.context.is_impersonating);
    }

    #[test]
    fn onboarding_gate_redirects_unfinished_accounts() {
        let mut business = session(AccountRole::Business);
        business.onboarding_complete = false;

        let redirect = resolve("/client/home", &business).redirect().cloned().unwrap();
        assert_eq!(redirect.to, "/client/onboarding");
        assert_eq!(redirect.reason, RedirectReason::OnboardingRequired);

        let route = rendered(resolve("/client/onboarding/new-company", &business));
        assert_eq!(route.view, View::NewCompanyWizard);
        assert_eq!(route.layout, LayoutVariant::Onboarding);

    }

    #[test]
    fn new_professionals_are_not_gated() {
        let mut pro = session(AccountRole::Professional);
        pro.onboarding_complete = false;

        for path in ["/professional/home", "/professional/clients", "/professional/c-7/home"] {
            let route = rendered(resolve(path, &pro));
            assert_eq!(route.guard, Some(AccountRole::Professional), "{path}");
        }
        let route = rendered(resolve("/professional/onboarding", &pro));
        assert_eq!(route.view, View::ProfessionalOnboarding);
    }

    #[test]
    fn guard_check_covers_role_without_user() {
        let stale = Session {
            user: None,
            role: Some(AccountRole::Professional),
            onboarding_complete: true,
        };
        assert_eq!(
            check_guard(AccountRole::Professional, &stale),
            Err(GuardFailure::Unauthenticated {
                required: AccountRole::Professional
            })
        );
    }
}
