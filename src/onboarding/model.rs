//! Onboarding data models: wizard variants, field values and the payload.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::AccountRole;

/// The two onboarding flows a business can pick from the selector screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardVariant {
    /// Incorporate a new company.
    NewCompany,
    /// Bring an already incorporated company on board.
    ExistingCompany,
}

impl WizardVariant {
    /// Path segment used in URLs (`new-company`, `existing-company`).
    pub fn slug(&self) -> &'static str {
        match self {
            Self::NewCompany => "new-company",
            Self::ExistingCompany => "existing-company",
        }
    }

    /// The account role allowed to run this wizard.
    pub fn account_role(&self) -> AccountRole {
        match self {
            Self::NewCompany | Self::ExistingCompany => AccountRole::Business,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "new-company" => Some(Self::NewCompany),
            "existing-company" => Some(Self::ExistingCompany),
            _ => None,
        }
    }
}

impl std::fmt::Display for WizardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A nested record, e.g. one director.
pub type Record = BTreeMap<String, FieldValue>;

/// A single form field value.
///
/// Untagged on the wire: a JSON string, an array of strings, an array of
/// objects, or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Records(Vec<Record>),
    Record(Record),
}

impl FieldValue {
    /// Whether the value counts as "not filled in" for required-field checks.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
            Self::Records(records) => records.is_empty(),
            Self::Record(record) => record.values().all(FieldValue::is_blank),
        }
    }

    /// Short description of the value's shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "a list of options",
            Self::Records(_) => "a list of records",
            Self::Record(_) => "a record",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// The snapshot handed to the completion collaborator on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingPayload {
    pub variant: WizardVariant,
    pub fields: BTreeMap<String, FieldValue>,
    pub submitted_at: DateTime<Utc>,
}
