//! Session collaborator — who is signed in, and as which kind of account.
//!
//! The router only reads the session; the auth pages and the onboarding
//! wizard are the only writers.

pub mod model;
pub mod provider;
pub mod routes;

pub use model::{AccountRole, Identity, Session};
pub use provider::{InMemoryAuth, SessionProvider};
pub use routes::{SessionRouteState, session_routes};
