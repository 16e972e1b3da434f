//! Sidebar navigation built from the active namespace.

use serde::Serialize;

use super::layout::LayoutVariant;
use super::paths::{PROFESSIONAL_CLIENTS, link_to, resolve_base_path};
use super::resolver::NavigationContext;
use super::table::{CLIENT_PAGES, PROFESSIONAL_PAGES, PageLink, View};
use crate::session::AccountRole;

/// One sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
    pub active: bool,
}

fn page_items(pages: &[PageLink], base: &str, current: View) -> Vec<NavItem> {
    pages
        .iter()
        .map(|page| NavItem {
            label: page.label.to_string(),
            href: link_to(base, page.slug),
            view: Some(page.view),
            active: page.view == current,
        })
        .collect()
}

/// Sidebar entries for a rendered page.
///
/// Client-sidebar links are prefixed through [`resolve_base_path`], so the
/// same sidebar serves both `/client/...` and `/professional/{id}/...`.
pub fn sidebar(
    layout: LayoutVariant,
    current: View,
    context: &NavigationContext,
) -> Vec<NavItem> {
    match layout {
        LayoutVariant::ClientSidebar => {
            let impersonated = context.impersonated_client_id();
            let role = if impersonated.is_some() {
                AccountRole::Professional
            } else {
                AccountRole::Business
            };
            let base = resolve_base_path(role, impersonated);

            let mut items = page_items(CLIENT_PAGES, &base, current);

            if impersonated.is_some() {
                items.push(NavItem {
                    label: "Back to clients".to_string(),
                    href: PROFESSIONAL_CLIENTS.to_string(),
                    view: Some(View::ProfessionalClients),
                    active: false,
                });
            }
            items
        }
        LayoutVariant::ProfessionalSidebar => {
            let base = resolve_base_path(AccountRole::Professional, None);
            page_items(PROFESSIONAL_PAGES, &base, current)
        }
        LayoutVariant::Public | LayoutVariant::Onboarding | LayoutVariant::Bare => Vec::new(),
    }
}
