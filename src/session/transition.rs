//! Pure onboarding transition function

use super::state::OnboardingStep;
use super::{Effect, Event};
use thiserror::Error;

/// Result of one transition
#[derive(Debug)]
pub struct TransitionResult {
    pub next: OnboardingStep,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    fn new(next: OnboardingStep) -> Self {
        Self {
            next,
            effects: vec![],
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("No transition from {step:?} for {event}")]
    InvalidTransition {
        step: OnboardingStep,
        event: &'static str,
    },
}

/// Pure transition function: same inputs, same outputs, no I/O.
///
/// Guards that need remote confirmation are expressed by the events
/// themselves — an event only exists once its round trip succeeded, so a
/// failed remote call simply never reaches this function and the step stays
/// where it was.
pub fn transition(
    step: OnboardingStep,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (step, event) {
        // Welcome -> Permissions, once the account exists
        (OnboardingStep::Welcome, Event::IdentityCreated { identity }) => {
            Ok(TransitionResult::new(OnboardingStep::Permissions)
                .with_effect(Effect::PersistIdentity { identity }))
        }

        // Permissions -> Baseline, unconditional: grants never block
        (OnboardingStep::Permissions, Event::PermissionsAcknowledged) => {
            Ok(TransitionResult::new(OnboardingStep::Baseline))
        }

        // Baseline -> Ready, carrying the initial recommendation
        (OnboardingStep::Baseline, Event::BaselineConfirmed { result }) => {
            Ok(TransitionResult::new(OnboardingStep::Ready)
                .with_effect(Effect::PersistInference { result }))
        }

        (step, event) => Err(TransitionError::InvalidTransition {
            step,
            event: event.name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InferenceResult, UserIdentity};

    fn identity() -> UserIdentity {
        UserIdentity {
            id: 7,
            display_name: "Ana".to_string(),
        }
    }

    fn inference() -> InferenceResult {
        InferenceResult {
            pred_label: "Rest".to_string(),
            pred_index: Some(0),
            pred_activity_id: Some(0),
            probs: vec![0.9, 0.02, 0.02, 0.02, 0.02, 0.02],
        }
    }

    #[test]
    fn welcome_advances_on_identity() {
        let result = transition(
            OnboardingStep::Welcome,
            Event::IdentityCreated {
                identity: identity(),
            },
        )
        .unwrap();
        assert_eq!(result.next, OnboardingStep::Permissions);
        assert_eq!(
            result.effects,
            vec![Effect::PersistIdentity {
                identity: identity()
            }]
        );
    }

    #[test]
    fn permissions_advance_unconditionally() {
        let result =
            transition(OnboardingStep::Permissions, Event::PermissionsAcknowledged).unwrap();
        assert_eq!(result.next, OnboardingStep::Baseline);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn baseline_advances_with_inference_effect() {
        let result = transition(
            OnboardingStep::Baseline,
            Event::BaselineConfirmed {
                result: inference(),
            },
        )
        .unwrap();
        assert_eq!(result.next, OnboardingStep::Ready);
        assert_eq!(
            result.effects,
            vec![Effect::PersistInference {
                result: inference()
            }]
        );
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        assert!(transition(OnboardingStep::Welcome, Event::PermissionsAcknowledged).is_err());
        assert!(transition(
            OnboardingStep::Ready,
            Event::BaselineConfirmed {
                result: inference()
            }
        )
        .is_err());
        assert!(transition(
            OnboardingStep::Baseline,
            Event::IdentityCreated {
                identity: identity()
            }
        )
        .is_err());
    }
}
