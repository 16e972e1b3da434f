//! Session and identity models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of account a user signed up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// A small business owner ("client" namespace).
    Business,
    /// A CA / CS / lawyer serving businesses.
    Professional,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Business => write!(f, "business"),
            Self::Professional => write!(f, "professional"),
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

/// The current session as seen by the router.
///
/// `role` stays set after sign-out so a guard failure can still pick a
/// sensible sign-in page; `user` is what decides authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AccountRole>,
    pub onboarding_complete: bool,
}

impl Session {
    /// An anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in session.
    pub fn signed_in(user: Identity, role: AccountRole, onboarding_complete: bool) -> Self {
        Self {
            user: Some(user),
            role: Some(role),
            onboarding_complete,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the session is signed in with the given role.
    pub fn has_role(&self, role: AccountRole) -> bool {
        self.is_authenticated() && self.role == Some(role)
    }
}

impl Identity {
    /// Build an identity from an email, deriving the display name from its local part.
    pub fn from_email(email: &str) -> Self {
        let local = email.split('@').next().unwrap_or(email);
        let display_name = local
            .split(['.', '_', '-'])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            display_name,
        }
    }
}
