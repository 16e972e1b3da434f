//! Compliance Desk — role-aware dashboard routing and company onboarding.

pub mod config;
pub mod directory;
pub mod error;
pub mod notifications;
pub mod onboarding;
pub mod routing;
pub mod server;
pub mod session;
