//! REST endpoints for sign-in, sign-up, sign-out and the current session.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

use super::model::AccountRole;
use super::provider::SessionProvider;
use crate::error::SessionError;

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionRouteState {
    pub sessions: Arc<dyn SessionProvider>,
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
    role: AccountRole,
}

fn session_error_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::InvalidCredentials | SessionError::RoleMismatch { .. } => {
            StatusCode::UNAUTHORIZED
        }
        SessionError::AlreadyRegistered { .. } => StatusCode::CONFLICT,
        SessionError::InvalidEmail(_) | SessionError::WeakPassword { .. } => {
            StatusCode::BAD_REQUEST
        }
        SessionError::NotSignedIn => StatusCode::UNAUTHORIZED,
    }
}

fn error_response(err: SessionError) -> axum::response::Response {
    (
        session_error_status(&err),
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

/// GET /api/session
async fn get_session(State(state): State<SessionRouteState>) -> impl IntoResponse {
    Json(state.sessions.current_session().await)
}

/// POST /api/auth/sign-in
async fn sign_in(
    State(state): State<SessionRouteState>,
    Json(body): Json<CredentialsRequest>,
) -> impl IntoResponse {
    let password = SecretString::from(body.password);
    match state.sessions.sign_in(&body.email, &password, body.role).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => {
            info!(email = %body.email, error = %e, "Sign-in rejected");
            error_response(e)
        }
    }
}

/// POST /api/auth/sign-up
async fn sign_up(
    State(state): State<SessionRouteState>,
    Json(body): Json<CredentialsRequest>,
) -> impl IntoResponse {
    let password = SecretString::from(body.password);
    match state.sessions.sign_up(&body.email, &password, body.role).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/auth/sign-out
async fn sign_out(State(state): State<SessionRouteState>) -> impl IntoResponse {
    state.sessions.sign_out().await;
    StatusCode::NO_CONTENT
}

/// Build the session REST routes.
pub fn session_routes(state: SessionRouteState) -> Router {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/sign-up", post(sign_up))
        .route("/api/auth/sign-out", post(sign_out))
        .with_state(state)
}
