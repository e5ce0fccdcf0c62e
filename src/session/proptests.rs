//! Property-based tests for the onboarding transition
//!
//! These verify the step machine's invariants hold across all inputs.

use super::state::OnboardingStep;
use super::transition::transition;
use super::{Effect, Event};
use crate::store::{InferenceResult, UserIdentity};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_step() -> impl Strategy<Value = OnboardingStep> {
    prop_oneof![
        Just(OnboardingStep::Welcome),
        Just(OnboardingStep::Permissions),
        Just(OnboardingStep::Baseline),
        Just(OnboardingStep::Ready),
    ]
}

fn arb_identity() -> impl Strategy<Value = UserIdentity> {
    (1i64..10_000, "[A-Z][a-z ]{0,11}").prop_map(|(id, display_name)| UserIdentity {
        id,
        display_name,
    })
}

fn arb_inference() -> impl Strategy<Value = InferenceResult> {
    (
        "[A-Z][a-z]{2,10}",
        proptest::option::of(0i64..6),
        proptest::collection::vec(0.0f64..1.0, 0..6),
    )
        .prop_map(|(pred_label, pred_index, probs)| InferenceResult {
            pred_label,
            pred_index,
            pred_activity_id: None,
            probs,
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_identity().prop_map(|identity| Event::IdentityCreated { identity }),
        Just(Event::PermissionsAcknowledged),
        arb_inference().prop_map(|result| Event::BaselineConfirmed { result }),
    ]
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    #[test]
    fn accepted_events_advance_exactly_one_step(step in arb_step(), event in arb_event()) {
        if let Ok(result) = transition(step, event) {
            prop_assert_eq!(result.next.index(), step.index() + 1);
        }
    }

    #[test]
    fn ready_is_terminal(event in arb_event()) {
        prop_assert!(transition(OnboardingStep::Ready, event).is_err());
    }

    #[test]
    fn transition_is_deterministic(step in arb_step(), event in arb_event()) {
        let first = transition(step, event.clone());
        let second = transition(step, event);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.next, b.next);
                prop_assert_eq!(a.effects, b.effects);
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "same inputs disagreed"),
        }
    }

    #[test]
    fn effects_match_their_steps(step in arb_step(), event in arb_event()) {
        if let Ok(result) = transition(step, event) {
            match step {
                OnboardingStep::Welcome => {
                    let ok = matches!(
                        result.effects.as_slice(),
                        [Effect::PersistIdentity { .. }]
                    );
                    prop_assert!(ok);
                }
                OnboardingStep::Permissions => prop_assert!(result.effects.is_empty()),
                OnboardingStep::Baseline => {
                    let ok = matches!(
                        result.effects.as_slice(),
                        [Effect::PersistInference { .. }]
                    );
                    prop_assert!(ok);
                }
                OnboardingStep::Ready => prop_assert!(false, "terminal step accepted an event"),
            }
        }
    }
}
