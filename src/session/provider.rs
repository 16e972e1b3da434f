//! Session collaborator — sign-in, sign-up, sign-out and the current session.
//!
//! The dashboard has no real backend; `InMemoryAuth` keeps a handful of
//! seeded demo accounts and one current session in memory.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::model::{AccountRole, Identity, Session};
use crate::error::SessionError;

/// Minimum accepted password length for sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Whether `email` looks like an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Identity collaborator consumed by the router and the auth pages.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Sign in with an existing account of the given role.
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
        role: AccountRole,
    ) -> Result<Session, SessionError>;

    /// Register a new account and sign in as it.
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        role: AccountRole,
    ) -> Result<Session, SessionError>;

    /// End the current session.
    async fn sign_out(&self);

    /// Snapshot of the current session.
    async fn current_session(&self) -> Session;
}

struct Account {
    identity: Identity,
    role: AccountRole,
    password: SecretString,
    onboarding_complete: bool,
}

/// In-memory accounts plus the single current session.
pub struct InMemoryAuth {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Session>,
    completion_delay: Duration,
    fail_completions: AtomicBool,
}

impl InMemoryAuth {
    /// Create an empty account store.
    pub fn new(completion_delay: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(Session::anonymous()),
            completion_delay,
            fail_completions: AtomicBool::new(false),
        }
    }

    /// Create a store seeded with the demo accounts (password `password` for all).
    pub fn with_demo_accounts(completion_delay: Duration) -> Self {
        let seeded = [
            ("owner@acme.in", AccountRole::Business, true),
            ("founder@newco.in", AccountRole::Business, false),
            ("ca.mehta@ledgerpartners.in", AccountRole::Professional, true),
        ];
        let accounts = seeded
            .into_iter()
            .map(|(email, role, onboarding_complete)| {
                (
                    email.to_string(),
                    Account {
                        identity: Identity::from_email(email),
                        role,
                        password: SecretString::from("password".to_string()),
                        onboarding_complete,
                    },
                )
            })
            .collect();
        Self {
            accounts: RwLock::new(accounts),
            ..Self::new(completion_delay)
        }
    }

    /// Make every subsequent onboarding completion fail (or succeed again).
    pub fn set_fail_completions(&self, fail: bool) {
        self.fail_completions.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn completion_delay(&self) -> Duration {
        self.completion_delay
    }

    pub(crate) fn completions_fail(&self) -> bool {
        self.fail_completions.load(Ordering::SeqCst)
    }

    /// Mark the signed-in account as onboarded.
    pub(crate) async fn mark_onboarded(&self) -> Result<(), SessionError> {
        let email = self
            .current
            .read()
            .await
            .user
            .as_ref()
            .map(|u| u.email.clone())
            .ok_or(SessionError::NotSignedIn)?;

        if let Some(account) = self.accounts.write().await.get_mut(&email) {
            account.onboarding_complete = true;
        }
        self.current.write().await.onboarding_complete = true;
        info!(email = %email, "Onboarding marked complete");
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl SessionProvider for InMemoryAuth {
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
        role: AccountRole,
    ) -> Result<Session, SessionError> {
        let email = normalize_email(email);
        let accounts = self.accounts.read().await;
        let account = accounts.get(&email).ok_or_else(|| {
            debug!(email = %email, "Sign-in for unknown account");
            SessionError::InvalidCredentials
        })?;

        if account.password.expose_secret() != password.expose_secret() {
            warn!(email = %email, "Sign-in with wrong password");
            return Err(SessionError::InvalidCredentials);
        }
        if account.role != role {
            return Err(SessionError::RoleMismatch {
                email,
                requested: role.to_string(),
                actual: account.role.to_string(),
            });
        }

        let session = Session::signed_in(
            account.identity.clone(),
            account.role,
            account.onboarding_complete,
        );
        drop(accounts);
        *self.current.write().await = session.clone();
        info!(email = %email, role = %role, "Signed in");
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        role: AccountRole,
    ) -> Result<Session, SessionError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(SessionError::InvalidEmail(email));
        }
        if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(SessionError::AlreadyRegistered { email });
        }

        let identity = Identity::from_email(&email);
        accounts.insert(
            email.clone(),
            Account {
                identity: identity.clone(),
                role,
                password: SecretString::from(password.expose_secret().to_string()),
                onboarding_complete: false,
            },
        );
        drop(accounts);

        let session = Session::signed_in(identity, role, false);
        *self.current.write().await = session.clone();
        info!(email = %email, role = %role, "Account registered");
        Ok(session)
    }

    async fn sign_out(&self) {
        let mut current = self.current.write().await;
        if let Some(user) = current.user.take() {
            info!(email = %user.email, "Signed out");
        }
        current.onboarding_complete = false;
    }

    async fn current_session(&self) -> Session {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn auth() -> InMemoryAuth {
        InMemoryAuth::with_demo_accounts(Duration::ZERO)
    }

    #[tokio::test]
    async fn sign_in_with_demo_account() {
        let auth = auth();
        let session = auth
            .sign_in("Owner@Acme.in", &secret("password"), AccountRole::Business)
            .await
            .unwrap();
        assert!(session.has_role(AccountRole::Business));
        assert!(session.onboarding_complete);
        assert_eq!(auth.current_session().await, session);
    }

    #[tokio::test]
    async fn wrong_password_rejected() {
        let auth = auth();
        let err = auth
            .sign_in("owner@acme.in", &secret("nope"), AccountRole::Business)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert!(!auth.current_session().await.is_authenticated());
    }

    #[tokio::test]
    async fn role_mismatch_rejected() {
        let auth = auth();
        let err = auth
            .sign_in("owner@acme.in", &secret("password"), AccountRole::Professional)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::RoleMismatch { .. }));
    }

    #[tokio::test]
    async fn sign_up_then_duplicate() {
        let auth = auth();
        let session = auth
            .sign_up("new@firm.in", &secret("secret1"), AccountRole::Professional)
            .await
            .unwrap();
        assert!(session.has_role(AccountRole::Professional));
        assert!(!session.onboarding_complete);

        let err = auth
            .sign_up("new@firm.in", &secret("secret1"), AccountRole::Professional)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyRegistered { .. }));
    }

    #[tokio::test]
    async fn sign_up_validates_input() {
        let auth = auth();
        assert!(matches!(
            auth.sign_up("not-an-email", &secret("secret1"), AccountRole::Business)
                .await,
            Err(SessionError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.sign_up("a@b.com", &secret("123"), AccountRole::Business)
                .await,
            Err(SessionError::WeakPassword { min: 6 })
        ));
    }

    #[tokio::test]
    async fn sign_out_keeps_role_hint() {
        let auth = auth();
        auth.sign_in("ca.mehta@ledgerpartners.in", &secret("password"), AccountRole::Professional)
            .await
            .unwrap();
        auth.sign_out().await;
        let session = auth.current_session().await;
        assert!(!session.is_authenticated());
        assert_eq!(session.role, Some(AccountRole::Professional));
    }

    #[tokio::test]
    async fn mark_onboarded_updates_account_and_session() {
        let auth = auth();
        auth.sign_in("founder@newco.in", &secret("password"), AccountRole::Business)
            .await
            .unwrap();
        auth.mark_onboarded().await.unwrap();
        assert!(auth.current_session().await.onboarding_complete);

        auth.sign_out().await;
        let again = auth
            .sign_in("founder@newco.in", &secret("password"), AccountRole::Business)
            .await
            .unwrap();
        assert!(again.onboarding_complete);
    }

    #[tokio::test]
    async fn mark_onboarded_requires_user() {
        let auth = auth();
        assert!(matches!(
            auth.mark_onboarded().await,
            Err(SessionError::NotSignedIn)
        ));
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
    }
}
