//! Layout chrome: which shell wraps a view and where its sidebar goes.
//!
//! Sidebar placement depends only on the viewport width; it never affects
//! route resolution.

use serde::{Deserialize, Serialize};

use super::table::{Audience, View};

/// The shell a page renders inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Landing and sign-in pages.
    Public,
    /// Wizard screens, no sidebar.
    Onboarding,
    /// Client sidebar (also used while a professional views a client).
    ClientSidebar,
    /// A professional's own sidebar.
    ProfessionalSidebar,
    /// Not-found page.
    Bare,
}

impl LayoutVariant {
    pub fn has_sidebar(&self) -> bool {
        matches!(self, Self::ClientSidebar | Self::ProfessionalSidebar)
    }
}

/// Pick the layout for a view reached through a route of `audience`.
pub fn layout_for(view: View, audience: Audience) -> LayoutVariant {
    if view == View::NotFound {
        LayoutVariant::Bare
    } else if view.is_onboarding() {
        LayoutVariant::Onboarding
    } else if view.is_client_page() {
        LayoutVariant::ClientSidebar
    } else {
        match audience {
            Audience::Public => LayoutVariant::Public,
            Audience::Client => LayoutVariant::ClientSidebar,
            Audience::Professional => LayoutVariant::ProfessionalSidebar,
        }
    }
}

/// Viewport signal reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
}

/// Where the persistent sidebar renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarPlacement {
    Inline,
    SlideOver,
}

/// Sidebar placement for a layout, or `None` when the layout has no sidebar.
pub fn sidebar_placement(
    layout: LayoutVariant,
    viewport: Viewport,
    mobile_breakpoint: u32,
) -> Option<SidebarPlacement> {
    if !layout.has_sidebar() {
        return None;
    }
    if viewport.width >= mobile_breakpoint {
        Some(SidebarPlacement::Inline)
    } else {
        Some(SidebarPlacement::SlideOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_pages_use_client_sidebar_for_any_audience() {
        assert_eq!(layout_for(View::Home, Audience::Client), LayoutVariant::ClientSidebar);
        assert_eq!(
            layout_for(View::Home, Audience::Professional),
            LayoutVariant::ClientSidebar
        );
    }

    #[test]
    fn other_layouts() {
        assert_eq!(
            layout_for(View::ProfessionalTeam, Audience::Professional),
            LayoutVariant::ProfessionalSidebar
        );
        assert_eq!(layout_for(View::ClientAuth, Audience::Public), LayoutVariant::Public);
        assert_eq!(
            layout_for(View::NewCompanyWizard, Audience::Client),
            LayoutVariant::Onboarding
        );
        assert_eq!(layout_for(View::NotFound, Audience::Public), LayoutVariant::Bare);
    }

    #[test]
    fn placement_follows_breakpoint() {
        let layout = LayoutVariant::ClientSidebar;
        assert_eq!(
            sidebar_placement(layout, Viewport { width: 1280 }, 768),
            Some(SidebarPlacement::Inline)
        );
        assert_eq!(
            sidebar_placement(layout, Viewport { width: 768 }, 768),
            Some(SidebarPlacement::Inline)
        );
        assert_eq!(
            sidebar_placement(layout, Viewport { width: 390 }, 768),
            Some(SidebarPlacement::SlideOver)
        );
    }

    #[test]
    fn no_placement_without_sidebar() {
        assert_eq!(
            sidebar_placement(LayoutVariant::Onboarding, Viewport { width: 390 }, 768),
            None
        );
    }
}
