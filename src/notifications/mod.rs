//! Toast notifications — dismissable messages surfaced to the dashboard.

pub mod center;
pub mod model;
pub mod routes;

pub use center::NotificationCenter;
pub use model::{Notification, NotificationEvent, NotificationLevel};
pub use routes::notification_routes;
