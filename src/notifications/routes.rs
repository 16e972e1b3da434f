//! REST + WebSocket endpoints for toast notifications.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::center::NotificationCenter;
use super::model::NotificationEvent;

#[derive(Clone)]
pub struct NotificationRouteState {
    pub center: Arc<NotificationCenter>,
}

/// Build the notification routes.
pub fn notification_routes(center: Arc<NotificationCenter>) -> Router {
    Router::new()
        .route("/ws/notifications", get(ws_handler))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/{id}/dismiss", post(dismiss_notification))
        .with_state(NotificationRouteState { center })
}

async fn list_notifications(State(state): State<NotificationRouteState>) -> impl IntoResponse {
    Json(state.center.active().await)
}

async fn dismiss_notification(
    State(state): State<NotificationRouteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid notification ID"})),
        );
    };

    if state.center.dismiss(id).await {
        (StatusCode::OK, Json(serde_json::json!({"status": "dismissed"})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Notification not found or already dismissed"})),
        )
    }
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationRouteState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state.center))
}

async fn send_event(socket: &mut WebSocket, event: &NotificationEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize notification event");
            true
        }
    }
}

async fn handle_socket(mut socket: WebSocket, center: Arc<NotificationCenter>) {
    info!("Notification client connected");

    // subscribe before the snapshot so nothing pushed in between is lost
    let mut rx = center.subscribe();
    let sync = NotificationEvent::Sync {
        notifications: center.active().await,
    };
    if !send_event(&mut socket, &sync).await {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_event(&mut socket, &event).await {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(missed = n, "Notification client lagged behind broadcast");
                        let sync = NotificationEvent::Sync {
                            notifications: center.active().await,
                        };
                        if !send_event(&mut socket, &sync).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("Notification client disconnected");
}
