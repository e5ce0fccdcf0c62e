//! Effects produced by onboarding transitions

use crate::store::{InferenceResult, UserIdentity};

/// Store writes the engine executes after a transition. Keeping these out of
/// the transition function keeps it pure.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist the freshly created identity (`user_id` + `username`)
    PersistIdentity { identity: UserIdentity },
    /// Overwrite the single inference record
    PersistInference { result: InferenceResult },
}
