//! Notification center — in-memory toast queue with broadcast to WebSocket clients.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Notification, NotificationEvent};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Active toasts shown at once; pushing past this auto-dismisses the oldest.
const MAX_ACTIVE: usize = 20;

/// Dismissed toasts kept for history before the oldest are pruned.
const MAX_DISMISSED: usize = 50;

pub struct NotificationCenter {
    items: RwLock<VecDeque<Notification>>,
    tx: broadcast::Sender<NotificationEvent>,
}

impl NotificationCenter {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            items: RwLock::new(VecDeque::new()),
            tx,
        })
    }

    /// Subscribe to real-time notification events.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    /// Add a toast and broadcast it. Returns its id.
    pub async fn push(&self, notification: Notification) -> Uuid {
        let id = notification.id;
        info!(
            notification_id = %id,
            level = ?notification.level,
            title = %notification.title,
            "Notification pushed"
        );
        let event = NotificationEvent::Pushed {
            notification: notification.clone(),
        };
        let mut items = self.items.write().await;
        items.push_back(notification);

        // ok if nobody is listening
        let _ = self.tx.send(event);

        let active = items.iter().filter(|n| !n.dismissed).count();
        if active > MAX_ACTIVE {
            let mut overflow = active - MAX_ACTIVE;
            for item in items.iter_mut().filter(|n| !n.dismissed) {
                if overflow == 0 {
                    break;
                }
                item.dismissed = true;
                overflow -= 1;
                debug!(notification_id = %item.id, "Oldest notification auto-dismissed");
                let _ = self.tx.send(NotificationEvent::Dismissed { id: item.id });
            }
            prune_dismissed(&mut items);
        }
        id
    }

    /// Dismiss a toast. Returns false when unknown or already dismissed.
    pub async fn dismiss(&self, id: Uuid) -> bool {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if item.dismissed {
            debug!(notification_id = %id, "Notification already dismissed");
            return false;
        }
        item.dismissed = true;
        prune_dismissed(&mut items);

        let _ = self.tx.send(NotificationEvent::Dismissed { id });
        true
    }

    /// Toasts that have not been dismissed, oldest first.
    pub async fn active(&self) -> Vec<Notification> {
        self.items
            .read()
            .await
            .iter()
            .filter(|n| !n.dismissed)
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> Option<Notification> {
        self.items.read().await.iter().find(|n| n.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}

/// Drop the oldest dismissed toasts beyond the history limit.
fn prune_dismissed(items: &mut VecDeque<Notification>) {
    let dismissed = items.iter().filter(|n| n.dismissed).count();
    if dismissed > MAX_DISMISSED {
        let mut to_remove = dismissed - MAX_DISMISSED;
        items.retain(|n| {
            if n.dismissed && to_remove > 0 {
                to_remove -= 1;
                false
            } else {
                true
            }
        });
    }
}
