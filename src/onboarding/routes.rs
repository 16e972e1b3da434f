//! REST endpoints for the onboarding wizard.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use super::manager::{BackResult, SubmitOutcome, WizardManager};
use super::model::{FieldValue, WizardVariant};
use super::schema::StepDefinition;
use super::schemas::schema_for;
use super::state::WizardState;
use crate::error::WizardError;
use crate::session::SessionProvider;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<WizardManager>,
    pub sessions: Arc<dyn SessionProvider>,
}

/// Wizard state plus the definition of the screen it is on.
#[derive(Serialize)]
struct WizardView {
    #[serde(flatten)]
    state: WizardState,
    current_step: Option<&'static StepDefinition>,
}

impl From<WizardState> for WizardView {
    fn from(state: WizardState) -> Self {
        let current_step = state.current_step();
        Self {
            state,
            current_step,
        }
    }
}

fn unknown_variant(slug: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": format!("Unknown onboarding variant: {slug}")})),
    )
        .into_response()
}

fn wizard_error(err: WizardError) -> Response {
    let status = match &err {
        WizardError::NotStarted => StatusCode::NOT_FOUND,
        WizardError::UnknownField { .. } | WizardError::WrongFieldType { .. } => {
            StatusCode::BAD_REQUEST
        }
        WizardError::NotAtFinalStep { .. }
        | WizardError::AlreadySubmitted
        | WizardError::SubmissionInFlight => StatusCode::CONFLICT,
        WizardError::Validation(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": err.to_string(), "fields": errors})),
            )
                .into_response();
        }
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

fn wizard_state(wizard: WizardState) -> Response {
    Json(WizardView::from(wizard)).into_response()
}

/// Only a session of the variant's role may drive its wizard.
async fn authorize(state: &OnboardingRouteState, variant: WizardVariant) -> Result<(), Response> {
    let required = variant.account_role();
    let session = state.sessions.current_session().await;
    if session.has_role(required) {
        return Ok(());
    }
    let (status, message) = if session.is_authenticated() {
        info!(variant = %variant, role = ?session.role, "Wizard refused for role");
        (
            StatusCode::FORBIDDEN,
            format!("The {variant} wizard is only available to {required} accounts"),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            "Sign in to continue onboarding".to_string(),
        )
    };
    Err((status, Json(serde_json::json!({"error": message}))).into_response())
}

/// Authorize against the variant of the active wizard.
async fn authorize_active(state: &OnboardingRouteState) -> Result<(), Response> {
    match state.manager.current().await {
        Some(wizard) => authorize(state, wizard.variant).await,
        None => Err(wizard_error(WizardError::NotStarted)),
    }
}

/// GET /api/onboarding/schemas/{variant}
async fn get_schema(Path(slug): Path<String>) -> Response {
    match WizardVariant::from_slug(&slug) {
        Some(variant) => Json(schema_for(variant)).into_response(),
        None => unknown_variant(&slug),
    }
}

/// POST /api/onboarding/{variant}/start
///
/// Starts a fresh wizard on step 1. Any unfinished wizard is discarded.
async fn start_wizard(
    State(state): State<OnboardingRouteState>,
    Path(slug): Path<String>,
) -> Response {
    let Some(variant) = WizardVariant::from_slug(&slug) else {
        return unknown_variant(&slug);
    };
    if let Err(denied) = authorize(&state, variant).await {
        return denied;
    }
    let wizard = state.manager.start(variant).await;
    (StatusCode::CREATED, Json(WizardView::from(wizard))).into_response()
}

/// GET /api/onboarding/wizard
async fn get_wizard(State(state): State<OnboardingRouteState>) -> Response {
    if let Err(denied) = authorize_active(&state).await {
        return denied;
    }
    match state.manager.current().await {
        Some(wizard) => wizard_state(wizard),
        None => wizard_error(WizardError::NotStarted),
    }
}

/// POST /api/onboarding/wizard/next
async fn next_step(State(state): State<OnboardingRouteState>) -> Response {
    if let Err(denied) = authorize_active(&state).await {
        return denied;
    }
    match state.manager.next().await {
        Ok(wizard) => wizard_state(wizard),
        Err(e) => wizard_error(e),
    }
}

/// POST /api/onboarding/wizard/back
///
/// On the first step the wizard is left untouched and the caller is told
/// where to go instead.
async fn previous_step(State(state): State<OnboardingRouteState>) -> Response {
    if let Err(denied) = authorize_active(&state).await {
        return denied;
    }
    match state.manager.back().await {
        Ok(BackResult::Moved { state }) => wizard_state(state),
        Ok(BackResult::Exit { redirect_to }) => {
            Json(serde_json::json!({"exit": redirect_to})).into_response()
        }
        Err(e) => wizard_error(e),
    }
}

/// PUT /api/onboarding/wizard/fields/{name}
async fn update_field(
    State(state): State<OnboardingRouteState>,
    Path(name): Path<String>,
    Json(value): Json<FieldValue>,
) -> Response {
    if let Err(denied) = authorize_active(&state).await {
        return denied;
    }
    match state.manager.update_field(&name, value).await {
        Ok(wizard) => wizard_state(wizard),
        Err(e) => wizard_error(e),
    }
}

/// POST /api/onboarding/wizard/submit
async fn submit(State(state): State<OnboardingRouteState>) -> Response {
    if let Err(denied) = authorize_active(&state).await {
        return denied;
    }
    match state.manager.submit().await {
        Ok(outcome) => {
            let status = match &outcome {
                SubmitOutcome::Submitted { .. } => StatusCode::OK,
                SubmitOutcome::InFlight => StatusCode::ACCEPTED,
                SubmitOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
            };
            (status, Json(outcome)).into_response()
        }
        Err(e) => wizard_error(e),
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/schemas/{variant}", get(get_schema))
        .route("/api/onboarding/{variant}/start", post(start_wizard))
        .route("/api/onboarding/wizard", get(get_wizard))
        .route("/api/onboarding/wizard/next", post(next_step))
        .route("/api/onboarding/wizard/back", post(previous_step))
        .route("/api/onboarding/wizard/fields/{name}", put(update_field))
        .route("/api/onboarding/wizard/submit", post(submit))
        .with_state(state)
}
