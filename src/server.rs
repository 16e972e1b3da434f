//! HTTP surface: merges every module's router and resolves page paths.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::directory::{ClientDirectory, ClientSummary, InMemoryClientDirectory};
use crate::error::Result;
use crate::notifications::{NotificationCenter, notification_routes};
use crate::onboarding::{OnboardingRouteState, WizardManager, onboarding_routes};
use crate::routing::{
    NavItem, RedirectKind, RenderedRoute, Resolution, SidebarPlacement, Viewport, resolve, sidebar,
    sidebar_placement,
};
use crate::session::{InMemoryAuth, SessionProvider, SessionRouteState, session_routes};

/// Everything the handlers share.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionProvider>,
    pub wizard: Arc<WizardManager>,
    pub notifications: Arc<NotificationCenter>,
    pub directory: Arc<dyn ClientDirectory>,
    pub mobile_breakpoint: u32,
}

impl AppState {
    /// Wire the in-memory collaborators together.
    ///
    /// The auth service doubles as the onboarding completer, so a
    /// successful submission flips the signed-in session to onboarded.
    pub fn in_memory(config: &AppConfig) -> Self {
        let auth = Arc::new(InMemoryAuth::with_demo_accounts(config.completion_delay));
        auth.set_fail_completions(config.fail_completions);
        Self::with_auth(auth, config.mobile_breakpoint)
    }

    pub fn with_auth(auth: Arc<InMemoryAuth>, mobile_breakpoint: u32) -> Self {
        let notifications = NotificationCenter::new();
        let wizard = Arc::new(WizardManager::new(auth.clone(), Arc::clone(&notifications)));
        Self {
            sessions: auth,
            wizard,
            notifications,
            directory: Arc::new(InMemoryClientDirectory::seeded()),
            mobile_breakpoint,
        }
    }
}

/// A page that renders, with the chrome the client needs to draw it.
#[derive(Debug, Serialize)]
pub struct PageView {
    #[serde(flatten)]
    pub route: RenderedRoute,
    pub nav: Vec<NavItem>,
    pub sidebar_placement: Option<SidebarPlacement>,
    /// The client being viewed, when impersonating a known client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientSummary>,
}

/// `width` is kept raw: it only picks chrome, so junk falls back to desktop.
#[derive(Debug, Deserialize)]
struct PageQuery {
    width: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResolveQuery {
    path: String,
    width: Option<String>,
}

fn viewport_width(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|w| w.trim().parse().ok())
}

async fn describe(state: &AppState, route: RenderedRoute, width: Option<&str>) -> PageView {
    // unknown width renders the desktop chrome
    let viewport = Viewport {
        width: viewport_width(width).unwrap_or(state.mobile_breakpoint),
    };
    let placement = sidebar_placement(route.layout, viewport, state.mobile_breakpoint);
    let nav = sidebar(route.layout, route.view, &route.context);
    let client = match route.context.impersonated_client_id() {
        Some(id) => state.directory.find_client(id).await,
        None => None,
    };
    PageView {
        route,
        nav,
        sidebar_placement: placement,
        client,
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "compliance-desk"
    }))
}

/// GET /api/resolve?path=..&width=..
///
/// Resolution as data; redirects are reported, not followed.
async fn resolve_path(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> impl IntoResponse {
    let session = state.sessions.current_session().await;
    let resolution = resolve(&query.path, &session);
    let page = match &resolution {
        Resolution::Render(route) => {
            Some(describe(&state, route.clone(), query.width.as_deref()).await)
        }
        _ => None,
    };
    Json(serde_json::json!({
        "resolution": resolution,
        "page": page,
    }))
}

/// GET /api/clients
async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.directory.list_clients().await)
}

/// Fallback for every other GET: treat the request path as a page address.
async fn page(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let session = state.sessions.current_session().await;
    match resolve(uri.path(), &session) {
        Resolution::Render(route) => {
            debug!(path = %route.context.current_path, view = ?route.view, "Rendering page");
            Json(describe(&state, route, query.width.as_deref()).await).into_response()
        }
        Resolution::Redirect(redirect) => {
            info!(
                from = %uri.path(),
                to = %redirect.to,
                kind = ?redirect.kind,
                "Page redirect"
            );
            match redirect.kind {
                RedirectKind::Replace => Redirect::permanent(&redirect.to).into_response(),
                RedirectKind::Push => Redirect::to(&redirect.to).into_response(),
            }
        }
        Resolution::NotFound(context) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "view": "not_found",
                "layout": "bare",
                "context": context,
            })),
        )
            .into_response(),
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let core = Router::new()
        .route("/health", get(health))
        .route("/api/resolve", get(resolve_path))
        .route("/api/clients", get(list_clients))
        .fallback(get(page))
        .with_state(state.clone());

    Router::new()
        .merge(session_routes(SessionRouteState {
            sessions: Arc::clone(&state.sessions),
        }))
        .merge(onboarding_routes(OnboardingRouteState {
            manager: Arc::clone(&state.wizard),
            sessions: Arc::clone(&state.sessions),
        }))
        .merge(notification_routes(Arc::clone(&state.notifications)))
        .merge(core)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

/// Bind `0.0.0.0:{port}` and serve the in-memory application until shutdown.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let app = build_router(AppState::in_memory(config));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "Compliance Desk server started");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn width_parsing_is_lenient() {
        assert_eq!(viewport_width(Some("500")), Some(500));
        assert_eq!(viewport_width(Some(" 1024 ")), Some(1024));
        assert_eq!(viewport_width(Some("wide")), None);
        assert_eq!(viewport_width(Some("-3")), None);
        assert_eq!(viewport_width(None), None);
    }

    #[tokio::test]
    async fn serve_reports_a_taken_port() {
        let taken = tokio::net::TcpListener::bind(("0.0.0.0", 0)).await.unwrap();
        let config = AppConfig {
            port: taken.local_addr().unwrap().port(),
            ..AppConfig::default()
        };
        let err = serve(&config).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
