//! Role-aware routing — which page, which layout, which guard.
//!
//! One page component can be addressed under two namespaces:
//! `/client/X` for the business itself and `/professional/:clientId/X`
//! for a professional viewing that business. The namespace comes from the
//! session and the path, never from the page.

pub mod layout;
pub mod matcher;
pub mod nav;
pub mod paths;
pub mod resolver;
pub mod table;

pub use layout::{LayoutVariant, SidebarPlacement, Viewport, sidebar_placement};
pub use nav::{NavItem, sidebar};
pub use paths::{legacy_redirect, link_to, resolve_base_path, sign_in_path};
pub use resolver::{
    GuardFailure, NavigationContext, Redirect, RedirectKind, RedirectReason, RenderedRoute,
    Resolution, resolve,
};
pub use table::{Audience, ROUTES, RouteEntry, View};
