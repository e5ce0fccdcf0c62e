//! Events that advance the onboarding steps

use crate::store::{InferenceResult, UserIdentity};

/// External confirmations feeding the transition function. Each step advances
/// only once its confirmation arrives; there is no way to skip ahead.
#[derive(Debug, Clone)]
pub enum Event {
    /// The account-creation round trip succeeded
    IdentityCreated { identity: UserIdentity },
    /// The user moved past the permissions screen (grants are advisory)
    PermissionsAcknowledged,
    /// The baseline was accepted and the initial recommendation arrived
    BaselineConfirmed { result: InferenceResult },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::IdentityCreated { .. } => "identity_created",
            Event::PermissionsAcknowledged => "permissions_acknowledged",
            Event::BaselineConfirmed { .. } => "baseline_confirmed",
        }
    }
}
