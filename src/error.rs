//! Error types for Compliance Desk.
//!
//! Routing never produces errors: a failed guard is a redirect and an
//! unmatched path is the not-found view. Everything here belongs to the
//! collaborators and the onboarding wizard.

use std::collections::BTreeMap;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the sign-in / sign-up collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account {email} is registered as a {actual}, not a {requested}")]
    RoleMismatch {
        email: String,
        requested: String,
        actual: String,
    },

    #[error("An account already exists for {email}")]
    AlreadyRegistered { email: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("No user is signed in")]
    NotSignedIn,
}

/// Errors raised by wizard transitions.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("No onboarding wizard is active")]
    NotStarted,

    #[error("Unknown field {name} for the {variant} wizard")]
    UnknownField { variant: String, name: String },

    #[error("Field {name} expects {expected}, got {found}")]
    WrongFieldType {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Submit is only allowed on step {total}, wizard is on step {step}")]
    NotAtFinalStep { step: usize, total: usize },

    #[error("Onboarding was already submitted")]
    AlreadySubmitted,

    #[error("A submission is in progress; the wizard is locked until it settles")]
    SubmissionInFlight,

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),
}

/// Field name → human-readable message, rendered inline next to each field.
pub type FieldErrors = BTreeMap<String, String>;

/// Errors returned by the "complete onboarding" collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmissionError {
    #[error("Onboarding service rejected the submission: {reason}")]
    Rejected { reason: String },

    #[error("Onboarding service unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
