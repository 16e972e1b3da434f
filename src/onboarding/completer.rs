//! The "complete onboarding" collaborator.

use async_trait::async_trait;
use tracing::{info, warn};

use super::model::OnboardingPayload;
use crate::error::SubmissionError;
use crate::session::InMemoryAuth;

/// Receives the finished wizard payload. Called once per successful run.
#[async_trait]
pub trait OnboardingCompleter: Send + Sync {
    async fn complete_onboarding(&self, payload: &OnboardingPayload) -> Result<(), SubmissionError>;
}

/// The mock backend: waits out the simulated latency, then marks the
/// signed-in account as onboarded.
#[async_trait]
impl OnboardingCompleter for InMemoryAuth {
    async fn complete_onboarding(
        &self,
        payload: &OnboardingPayload,
    ) -> Result<(), SubmissionError> {
        let delay = self.completion_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.completions_fail() {
            warn!(variant = %payload.variant, "Simulated onboarding failure");
            return Err(SubmissionError::Unavailable(
                "onboarding service is not responding".to_string(),
            ));
        }

        self.mark_onboarded()
            .await
            .map_err(|e| SubmissionError::Rejected {
                reason: e.to_string(),
            })?;
        info!(
            variant = %payload.variant,
            fields = payload.fields.len(),
            "Onboarding payload accepted"
        );
        Ok(())
    }
}
