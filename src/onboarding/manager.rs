//! WizardManager — owns the active wizard and drives submission.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::completer::OnboardingCompleter;
use super::model::{FieldValue, WizardVariant};
use super::schemas::schema_for;
use super::state::{BackOutcome, SubmitStart, WizardState};
use crate::error::WizardError;
use crate::notifications::{Notification, NotificationCenter, NotificationLevel};
use crate::routing::paths::{CLIENT_ONBOARDING, link_to, resolve_base_path};

/// Result of a submit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Payload accepted; navigate away.
    Submitted { redirect_to: String },
    /// Another submission is still running; this one did nothing.
    InFlight,
    /// The collaborator rejected the payload; the wizard stays on its last step.
    Failed {
        reason: String,
        notification_id: Uuid,
    },
}

/// Result of a back request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackResult {
    Moved { state: WizardState },
    Exit { redirect_to: String },
}

/// Coordinates the single active onboarding wizard.
pub struct WizardManager {
    wizard: RwLock<Option<WizardState>>,
    completer: Arc<dyn OnboardingCompleter>,
    notifications: Arc<NotificationCenter>,
}

impl WizardManager {
    pub fn new(
        completer: Arc<dyn OnboardingCompleter>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            wizard: RwLock::new(None),
            completer,
            notifications,
        }
    }

    /// Start a fresh wizard for `variant`, replacing any active one.
    pub async fn start(&self, variant: WizardVariant) -> WizardState {
        let state = WizardState::new(schema_for(variant));
        let mut wizard = self.wizard.write().await;
        if let Some(previous) = wizard.as_ref().filter(|w| !w.phase.is_terminal()) {
            info!(
                previous = %previous.variant,
                step = %previous.phase,
                "Discarding unfinished wizard"
            );
        }
        *wizard = Some(state.clone());
        info!(variant = %variant, run_id = %state.run_id, "Onboarding wizard started");
        state
    }

    /// Snapshot of the active wizard.
    pub async fn current(&self) -> Option<WizardState> {
        self.wizard.read().await.clone()
    }

    async fn with_wizard<T>(
        &self,
        f: impl FnOnce(&mut WizardState) -> Result<T, WizardError>,
    ) -> Result<T, WizardError> {
        let mut guard = self.wizard.write().await;
        let wizard = guard.as_mut().ok_or(WizardError::NotStarted)?;
        f(wizard)
    }

    pub async fn next(&self) -> Result<WizardState, WizardError> {
        self.with_wizard(|w| {
            w.next()?;
            Ok(w.clone())
        })
        .await
    }

    /// Go back one step; on the first step the caller is sent to the selector.
    pub async fn back(&self) -> Result<BackResult, WizardError> {
        self.with_wizard(|w| match w.back()? {
            BackOutcome::Step(_) => Ok(BackResult::Moved { state: w.clone() }),
            BackOutcome::ExitToSelector => Ok(BackResult::Exit {
                redirect_to: CLIENT_ONBOARDING.to_string(),
            }),
        })
        .await
    }

    pub async fn update_field(
        &self,
        name: &str,
        value: FieldValue,
    ) -> Result<WizardState, WizardError> {
        self.with_wizard(|w| {
            w.update_field(name, value)?;
            Ok(w.clone())
        })
        .await
    }

    /// Submit the active wizard.
    ///
    /// The write lock is released before the collaborator is awaited; the
    /// wizard's `is_submitting` flag turns concurrent calls into no-ops.
    pub async fn submit(&self) -> Result<SubmitOutcome, WizardError> {
        let (run_id, payload) = {
            let mut guard = self.wizard.write().await;
            let wizard = guard.as_mut().ok_or(WizardError::NotStarted)?;
            match wizard.begin_submit()? {
                SubmitStart::InFlight => {
                    info!(run_id = %wizard.run_id, "Submit ignored, already in flight");
                    return Ok(SubmitOutcome::InFlight);
                }
                SubmitStart::Started(payload) => (wizard.run_id, payload),
            }
        };

        info!(run_id = %run_id, variant = %payload.variant, "Submitting onboarding");
        let result = self.completer.complete_onboarding(&payload).await;

        {
            let mut guard = self.wizard.write().await;
            match guard.as_mut().filter(|w| w.run_id == run_id) {
                Some(wizard) => wizard.finish_submit(&result),
                None => warn!(
                    run_id = %run_id,
                    "Wizard restarted while submission was in flight"
                ),
            }
        }

        match result {
            Ok(()) => {
                self.notifications
                    .push(Notification::new(
                        NotificationLevel::Success,
                        "Onboarding complete",
                        "Your company details were submitted.",
                    ))
                    .await;
                let base = resolve_base_path(payload.variant.account_role(), None);
                let home = link_to(&base, "home");
                Ok(SubmitOutcome::Submitted { redirect_to: home })
            }
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "Onboarding submission failed");
                let notification_id = self
                    .notifications
                    .push(
                        Notification::new(
                            NotificationLevel::Error,
                            "Submission failed",
                            format!("{e}. Please try again."),
                        )
                        .retryable(),
                    )
                    .await;
                Ok(SubmitOutcome::Failed {
                    reason: e.to_string(),
                    notification_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::SubmissionError;
    use crate::onboarding::model::OnboardingPayload;
    use crate::onboarding::state::WizardPhase;

    /// Completer whose answer is scripted and which can be held open.
    struct ScriptedCompleter {
        fail: bool,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl ScriptedCompleter {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OnboardingCompleter for ScriptedCompleter {
        async fn complete_onboarding(
            &self,
            _payload: &OnboardingPayload,
        ) -> Result<(), SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                Err(SubmissionError::Rejected {
                    reason: "backend said no".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn gated(fail: bool) -> (Arc<ScriptedCompleter>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let completer = Arc::new(ScriptedCompleter {
            fail,
            gate: Some(Arc::clone(&gate)),
            calls: AtomicUsize::new(0),
        });
        (completer, gate)
    }

    /// Spawn a submit and wait until it is parked inside the completer.
    async fn submit_in_background(
        manager: &Arc<WizardManager>,
        completer: &ScriptedCompleter,
    ) -> tokio::task::JoinHandle<Result<SubmitOutcome, WizardError>> {
        let handle = tokio::spawn({
            let manager = Arc::clone(manager);
            async move { manager.submit().await }
        });
        while completer.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        handle
    }

    async fn filled_manager(
        completer: Arc<ScriptedCompleter>,
    ) -> (WizardManager, Arc<NotificationCenter>) {
        let center = NotificationCenter::new();
        let manager = WizardManager::new(completer, Arc::clone(&center));
        manager.start(WizardVariant::NewCompany).await;

        let fields = serde_json::json!({
            "business_structure": "private_limited",
            "business_activity": "Software consulting",
            "state_of_incorporation": "Karnataka",
            "proposed_names": ["Acme Labs", "Acme Works"],
            "directors": [
                {
                    "full_name": "Ravi Iyer",
                    "email": "ravi@acme.in",
                    "phone": "9123456780",
                    "pan": "ABCPI1234D"
                },
                {
                    "full_name": "Meera Iyer",
                    "email": "meera@acme.in",
                    "phone": "9123456781",
                    "pan": "ABCPI5678E"
                }
            ],
            "registered_office": {
                "line1": "4 Residency Rd",
                "city": "Bengaluru",
                "state": "Karnataka",
                "pin_code": "560025"
            },
            "office_ownership": "rented",
            "authorized_capital": "100000",
            "contact_email": "ravi@acme.in",
            "consent": "accepted"
        });
        for (name, value) in fields.as_object().unwrap() {
            manager
                .update_field(name, serde_json::from_value(value.clone()).unwrap())
                .await
                .unwrap();
        }
        for _ in 0..4 {
            manager.next().await.unwrap();
        }
        (manager, center)
    }

    #[tokio::test]
    async fn operations_need_a_started_wizard() {
        let manager = WizardManager::new(
            Arc::new(ScriptedCompleter::new(false)),
            NotificationCenter::new(),
        );
        assert!(manager.current().await.is_none());
        assert!(matches!(manager.next().await, Err(WizardError::NotStarted)));
        assert!(matches!(manager.submit().await, Err(WizardError::NotStarted)));
    }

    #[tokio::test]
    async fn back_on_first_step_exits_to_selector() {
        let manager = WizardManager::new(
            Arc::new(ScriptedCompleter::new(false)),
            NotificationCenter::new(),
        );
        manager.start(WizardVariant::ExistingCompany).await;
        match manager.back().await.unwrap() {
            BackResult::Exit { redirect_to } => assert_eq!(redirect_to, "/client/onboarding"),
            other => panic!("expected exit, got {other:?}"),
        }
        assert_eq!(manager.current().await.unwrap().phase, WizardPhase::Step(1));
    }

    #[tokio::test]
    async fn successful_submit() {
        let completer = Arc::new(ScriptedCompleter::new(false));
        let (manager, center) = filled_manager(Arc::clone(&completer)).await;

        let outcome = manager.submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                redirect_to: "/client/home".into()
            }
        );
        let state = manager.current().await.unwrap();
        assert_eq!(state.phase, WizardPhase::Submitted);
        assert!(!state.is_submitting);
        assert_eq!(completer.calls.load(Ordering::SeqCst), 1);

        let active = center.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].level, NotificationLevel::Success);

        assert!(matches!(manager.submit().await, Err(WizardError::AlreadySubmitted)));
    }

    #[tokio::test]
    async fn rejected_submit_stays_on_last_step_and_notifies() {
        let completer = Arc::new(ScriptedCompleter::new(true));
        let (manager, center) = filled_manager(Arc::clone(&completer)).await;

        let outcome = manager.submit().await.unwrap();
        let notification_id = match outcome {
            SubmitOutcome::Failed { notification_id, .. } => notification_id,
            other => panic!("expected failure, got {other:?}"),
        };
        let state = manager.current().await.unwrap();
        assert_eq!(state.phase, WizardPhase::Step(5));
        assert!(!state.is_submitting);

        let toast = center.get(notification_id).await.unwrap();
        assert_eq!(toast.level, NotificationLevel::Error);
        assert!(toast.retryable);

        // retry is allowed
        assert!(matches!(
            manager.submit().await.unwrap(),
            SubmitOutcome::Failed { .. }
        ));
        assert_eq!(completer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_submit_is_a_no_op() {
        let (completer, gate) = gated(false);
        let (manager, _center) = filled_manager(Arc::clone(&completer)).await;
        let manager = Arc::new(manager);

        let first = submit_in_background(&manager, &completer).await;
        assert!(manager.current().await.unwrap().is_submitting);
        assert_eq!(manager.submit().await.unwrap(), SubmitOutcome::InFlight);

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Submitted { .. }));
        assert_eq!(completer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wizard_is_locked_while_submission_in_flight() {
        let (completer, gate) = gated(true);
        let (manager, _center) = filled_manager(Arc::clone(&completer)).await;
        let manager = Arc::new(manager);

        let first = submit_in_background(&manager, &completer).await;
        assert!(matches!(
            manager.back().await,
            Err(WizardError::SubmissionInFlight)
        ));
        assert!(matches!(
            manager.next().await,
            Err(WizardError::SubmissionInFlight)
        ));
        assert!(matches!(
            manager
                .update_field("contact_email", FieldValue::from("other@acme.in"))
                .await,
            Err(WizardError::SubmissionInFlight)
        ));

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));

        let state = manager.current().await.unwrap();
        assert_eq!(state.phase, WizardPhase::Step(state.total_steps));
        assert!(!state.is_submitting);
        assert_eq!(
            state.fields.get("contact_email"),
            Some(&FieldValue::from("ravi@acme.in"))
        );

        // unlocked again once the rejection has settled
        assert!(matches!(
            manager.back().await.unwrap(),
            BackResult::Moved { .. }
        ));
    }

    #[tokio::test]
    async fn validation_failure_does_not_call_completer() {
        let completer = Arc::new(ScriptedCompleter::new(false));
        let manager = WizardManager::new(completer.clone(), NotificationCenter::new());
        manager.start(WizardVariant::NewCompany).await;
        for _ in 0..4 {
            manager.next().await.unwrap();
        }
        assert!(matches!(manager.submit().await, Err(WizardError::Validation(_))));
        assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restart_discards_previous_run() {
        let completer = Arc::new(ScriptedCompleter::new(false));
        let (manager, _center) = filled_manager(completer).await;
        let fresh = manager.start(WizardVariant::ExistingCompany).await;
        let current = manager.current().await.unwrap();
        assert_eq!(current.run_id, fresh.run_id);
        assert_eq!(current.phase, WizardPhase::Step(1));
        assert!(current.fields.is_empty());
    }
}
