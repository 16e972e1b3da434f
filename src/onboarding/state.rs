//! Wizard state machine — a linear sequence of steps ending in one submission.
//!
//! `Step(1) ⇄ … ⇄ Step(total) → Submitted`. The machine is generic; the
//! schema it was created with decides how many steps there are and which
//! fields exist.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::model::{FieldValue, OnboardingPayload, WizardVariant};
use super::schema::{StepDefinition, WizardSchema};
use crate::error::{SubmissionError, WizardError};

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    /// A 1-based step.
    Step(usize),
    /// Terminal: the payload was accepted.
    Submitted,
}

impl WizardPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Step(n) => write!(f, "step {n}"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

/// Result of `back`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackOutcome {
    /// Moved to this step.
    Step(usize),
    /// Already on the first step; the caller leaves the wizard.
    ExitToSelector,
}

/// Result of starting a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// A submission is already in flight; nothing was done.
    InFlight,
    /// Submission started with this snapshot.
    Started(OnboardingPayload),
}

/// One run of a wizard.
#[derive(Debug, Clone, Serialize)]
pub struct WizardState {
    /// Identifies this run, so a late completion can't land on a restarted wizard.
    pub run_id: Uuid,
    pub variant: WizardVariant,
    pub phase: WizardPhase,
    pub total_steps: usize,
    pub fields: BTreeMap<String, FieldValue>,
    pub is_submitting: bool,
    #[serde(skip)]
    schema: &'static WizardSchema,
}

impl WizardState {
    /// Start a wizard on step 1.
    pub fn new(schema: &'static WizardSchema) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            variant: schema.variant,
            phase: WizardPhase::Step(1),
            total_steps: schema.total_steps().max(1),
            fields: BTreeMap::new(),
            is_submitting: false,
            schema,
        }
    }

    /// Current step number, or `None` once submitted.
    pub fn step(&self) -> Option<usize> {
        match self.phase {
            WizardPhase::Step(n) => Some(n),
            WizardPhase::Submitted => None,
        }
    }

    /// Definition of the screen currently shown.
    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        self.step().and_then(|n| self.schema.step(n))
    }

    fn require_step(&self) -> Result<usize, WizardError> {
        self.step().ok_or(WizardError::AlreadySubmitted)
    }

    /// Like `require_step`, but also refuses while a submission is in flight
    /// so the snapshot handed off stays the wizard's own state.
    fn require_editable_step(&self) -> Result<usize, WizardError> {
        let step = self.require_step()?;
        if self.is_submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        Ok(step)
    }

    /// Advance one step. Saturates on the last step; submission is a separate action.
    pub fn next(&mut self) -> Result<usize, WizardError> {
        let step = self.require_editable_step()?;
        let next = (step + 1).min(self.total_steps);
        self.phase = WizardPhase::Step(next);
        Ok(next)
    }

    /// Go back one step, or report that the caller should leave the wizard.
    pub fn back(&mut self) -> Result<BackOutcome, WizardError> {
        let step = self.require_editable_step()?;
        if step <= 1 {
            return Ok(BackOutcome::ExitToSelector);
        }
        self.phase = WizardPhase::Step(step - 1);
        Ok(BackOutcome::Step(step - 1))
    }

    /// Set a field. Works on any step; only the shape is checked here.
    pub fn update_field(&mut self, name: &str, value: FieldValue) -> Result<(), WizardError> {
        self.require_editable_step()?;
        let descriptor = self
            .schema
            .field(name)
            .ok_or_else(|| WizardError::UnknownField {
                variant: self.variant.to_string(),
                name: name.to_string(),
            })?;
        if !descriptor.kind.accepts(&value) {
            return Err(WizardError::WrongFieldType {
                name: name.to_string(),
                expected: descriptor.kind.expected_shape().to_string(),
                found: value.shape().to_string(),
            });
        }
        self.fields.insert(name.to_string(), value);
        Ok(())
    }

    /// Begin submission: final step only, validated, and not re-entrant.
    pub fn begin_submit(&mut self) -> Result<SubmitStart, WizardError> {
        let step = self.require_step()?;
        if step != self.total_steps {
            return Err(WizardError::NotAtFinalStep {
                step,
                total: self.total_steps,
            });
        }
        if self.is_submitting {
            return Ok(SubmitStart::InFlight);
        }
        self.schema
            .validate(&self.fields)
            .map_err(WizardError::Validation)?;

        self.is_submitting = true;
        Ok(SubmitStart::Started(OnboardingPayload {
            variant: self.variant,
            fields: self.fields.clone(),
            submitted_at: Utc::now(),
        }))
    }

    /// Record the collaborator's answer. Failure leaves the wizard on the final step.
    pub fn finish_submit(&mut self, result: &Result<(), SubmissionError>) {
        self.is_submitting = false;
        if result.is_ok() {
            self.phase = WizardPhase::Submitted;
        }
    }
}
