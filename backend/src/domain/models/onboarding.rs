//! Onboarding wizard state and the stored response record.

use chrono::{DateTime, FixedOffset};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Step1,
    Step2,
    Step3,
    Step4,
    Step5,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 5] = [
        OnboardingStep::Step1,
        OnboardingStep::Step2,
        OnboardingStep::Step3,
        OnboardingStep::Step4,
        OnboardingStep::Step5,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OnboardingStep::Step1 => "step1",
            OnboardingStep::Step2 => "step2",
            OnboardingStep::Step3 => "step3",
            OnboardingStep::Step4 => "step4",
            OnboardingStep::Step5 => "step5",
        }
    }
}

/// Accumulated wizard answers, one optional slot per step.
///
/// This is an explicitly constructed state object: created when the wizard
/// starts, passed by reference through the flow, consumed at finalize and
/// discarded with the wizard. Slot values are opaque to the accumulator —
/// no shape validation happens here. Partial onboarding (unset slots) is a
/// valid, representable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub step1: Option<Value>,
    pub step2: Option<Value>,
    pub step3: Option<Value>,
    pub step4: Option<Value>,
    pub step5: Option<Value>,
}

impl OnboardingState {
    pub fn new() -> Self {
        OnboardingState::default()
    }

    /// Replace one slot. Setting a slot twice keeps the later value.
    pub fn set(&mut self, step: OnboardingStep, value: Value) {
        *self.slot_mut(step) = Some(value);
    }

    pub fn get(&self, step: OnboardingStep) -> Option<&Value> {
        match step {
            OnboardingStep::Step1 => self.step1.as_ref(),
            OnboardingStep::Step2 => self.step2.as_ref(),
            OnboardingStep::Step3 => self.step3.as_ref(),
            OnboardingStep::Step4 => self.step4.as_ref(),
            OnboardingStep::Step5 => self.step5.as_ref(),
        }
    }

    /// Snapshot the full five slots for the one-time account-creation
    /// write. Unset slots stay `None`; the accumulator is not cleared.
    pub fn finalize(&self) -> OnboardingState {
        self.clone()
    }

    pub fn answered_count(&self) -> usize {
        OnboardingStep::ALL
            .iter()
            .filter(|step| self.get(**step).is_some())
            .count()
    }

    fn slot_mut(&mut self, step: OnboardingStep) -> &mut Option<Value> {
        match step {
            OnboardingStep::Step1 => &mut self.step1,
            OnboardingStep::Step2 => &mut self.step2,
            OnboardingStep::Step3 => &mut self.step3,
            OnboardingStep::Step4 => &mut self.step4,
            OnboardingStep::Step5 => &mut self.step5,
        }
    }
}

/// A document from the `onboarding_responses` collection: the finalized
/// snapshot written once at account creation and never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    pub id: String,
    #[serde(flatten)]
    pub state: OnboardingState,
    pub created_at: DateTime<FixedOffset>,
}

impl OnboardingResponse {
    pub fn from_document(document: &Value) -> Option<Self> {
        match serde_json::from_value(document.clone()) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("Skipping malformed onboarding response: {}", e);
                None
            }
        }
    }
}
