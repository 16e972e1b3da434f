//! The static route table.
//!
//! Every literal path below is part of the dashboard's public addressing
//! scheme; links, bookmarks and the legacy redirects depend on them.

use serde::{Deserialize, Serialize};

use crate::session::AccountRole;

/// Who a route is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Public,
    Client,
    Professional,
}

impl Audience {
    /// The account role a guarded route of this audience requires.
    pub fn required_role(&self) -> Option<AccountRole> {
        match self {
            Self::Public => None,
            Self::Client => Some(AccountRole::Business),
            Self::Professional => Some(AccountRole::Professional),
        }
    }
}

/// Page identifiers. One view may be reachable under several paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Landing,
    ClientAuth,
    ProfessionalAuth,
    OnboardingSelector,
    NewCompanyWizard,
    ExistingCompanyWizard,
    ProfessionalOnboarding,
    Home,
    Company,
    Documents,
    Tasks,
    Compliances,
    LegalServices,
    Payments,
    Messages,
    Settings,
    ProfessionalHome,
    ProfessionalClients,
    ProfessionalTasks,
    ProfessionalMessages,
    ProfessionalTeam,
    ProfessionalSettings,
    NotFound,
}

impl View {
    /// Client-facing pages, shared by `/client/...` and `/professional/:clientId/...`.
    pub fn is_client_page(&self) -> bool {
        CLIENT_PAGES.iter().any(|page| page.view == *self)
    }

    /// Pages that belong to an onboarding flow and are exempt from the onboarding gate.
    pub fn is_onboarding(&self) -> bool {
        matches!(
            self,
            Self::OnboardingSelector
                | Self::NewCompanyWizard
                | Self::ExistingCompanyWizard
                | Self::ProfessionalOnboarding
        )
    }
}

/// A sidebar page: its path slug under the namespace base, view and label.
#[derive(Debug, Clone, Copy)]
pub struct PageLink {
    pub slug: &'static str,
    pub view: View,
    pub label: &'static str,
}

const fn page(slug: &'static str, view: View, label: &'static str) -> PageLink {
    PageLink { slug, view, label }
}

/// Client pages in sidebar order.
pub const CLIENT_PAGES: &[PageLink] = &[
    page("home", View::Home, "Home"),
    page("company", View::Company, "Company"),
    page("documents", View::Documents, "Documents"),
    page("tasks", View::Tasks, "Tasks"),
    page("compliances", View::Compliances, "Compliances"),
    page("legal-services", View::LegalServices, "Legal Services"),
    page("payments", View::Payments, "Payments"),
    page("messages", View::Messages, "Messages"),
    page("settings", View::Settings, "Settings"),
];

/// A professional's own pages in sidebar order.
pub const PROFESSIONAL_PAGES: &[PageLink] = &[
    page("home", View::ProfessionalHome, "Dashboard"),
    page("clients", View::ProfessionalClients, "Clients"),
    page("tasks", View::ProfessionalTasks, "Tasks"),
    page("messages", View::ProfessionalMessages, "Messages"),
    page("team", View::ProfessionalTeam, "Team"),
    page("settings", View::ProfessionalSettings, "Settings"),
];

/// One row of the route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    /// Path template; `:name` segments are parameters, `*` is the catch-all.
    pub pattern: &'static str,
    pub audience: Audience,
    pub view: View,
    pub guarded: bool,
}

const fn public(pattern: &'static str, view: View) -> RouteEntry {
    RouteEntry {
        pattern,
        audience: Audience::Public,
        view,
        guarded: false,
    }
}

const fn client(pattern: &'static str, view: View) -> RouteEntry {
    RouteEntry {
        pattern,
        audience: Audience::Client,
        view,
        guarded: true,
    }
}

const fn professional(pattern: &'static str, view: View) -> RouteEntry {
    RouteEntry {
        pattern,
        audience: Audience::Professional,
        view,
        guarded: true,
    }
}

/// The catch-all pattern.
pub const CATCH_ALL: &str = "*";

/// Route table in declaration order. The catch-all must stay last.
pub static ROUTES: &[RouteEntry] = &[
    public("/", View::Landing),
    public("/client/auth", View::ClientAuth),
    public("/professional/auth", View::ProfessionalAuth),
    // onboarding
    client("/client/onboarding", View::OnboardingSelector),
    client("/client/onboarding/new-company", View::NewCompanyWizard),
    client("/client/onboarding/existing-company", View::ExistingCompanyWizard),
    professional("/professional/onboarding", View::ProfessionalOnboarding),
    // client namespace
    client("/client/home", View::Home),
    client("/client/company", View::Company),
    client("/client/documents", View::Documents),
    client("/client/tasks", View::Tasks),
    client("/client/compliances", View::Compliances),
    client("/client/legal-services", View::LegalServices),
    client("/client/payments", View::Payments),
    client("/client/messages", View::Messages),
    client("/client/settings", View::Settings),
    // professional's own pages
    professional("/professional/home", View::ProfessionalHome),
    professional("/professional/clients", View::ProfessionalClients),
    professional("/professional/tasks", View::ProfessionalTasks),
    professional("/professional/messages", View::ProfessionalMessages),
    professional("/professional/team", View::ProfessionalTeam),
    professional("/professional/settings", View::ProfessionalSettings),
    // professional viewing a client
    professional("/professional/:clientId/home", View::Home),
    professional("/professional/:clientId/company", View::Company),
    professional("/professional/:clientId/documents", View::Documents),
    professional("/professional/:clientId/tasks", View::Tasks),
    professional("/professional/:clientId/compliances", View::Compliances),
    professional("/professional/:clientId/legal-services", View::LegalServices),
    professional("/professional/:clientId/payments", View::Payments),
    professional("/professional/:clientId/messages", View::Messages),
    professional("/professional/:clientId/settings", View::Settings),
    public(CATCH_ALL, View::NotFound),
];

/// Name of the route parameter that selects the impersonated client.
pub const CLIENT_ID_PARAM: &str = "clientId";
