//! Onboarding wizard — the first thing a new business account sees.
//!
//! One generic step engine (`state`) runs either of two schemas
//! (`schemas`). The manager owns the active run and hands the finished
//! payload to an `OnboardingCompleter` exactly once.

pub mod completer;
pub mod manager;
pub mod model;
pub mod routes;
pub mod schema;
pub mod schemas;
pub mod state;

pub use completer::OnboardingCompleter;
pub use manager::{BackResult, SubmitOutcome, WizardManager};
pub use model::{FieldValue, OnboardingPayload, Record, WizardVariant};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use schema::{FieldDescriptor, FieldKind, StepDefinition, WizardSchema};
pub use schemas::schema_for;
pub use state::{BackOutcome, WizardPhase, WizardState};
