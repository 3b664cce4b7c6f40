//! Domain model for a user profile record.

use chrono::{DateTime, FixedOffset};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::onboarding::OnboardingState;

/// A document from the `users` collection, keyed by the auth provider's
/// uid rather than a store-assigned id.
///
/// `xp` is a shared counter raced by rapid transaction writes; it is only
/// ever mutated through the store's atomic increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Auth provider label ("password", "google", "phone").
    pub provider: String,
    #[serde(default)]
    pub xp: i64,
    /// Finalized onboarding snapshot embedded at account creation.
    #[serde(default)]
    pub onboarding: OnboardingState,
    pub created_at: DateTime<FixedOffset>,
}

impl UserProfile {
    pub fn from_document(document: &Value) -> Option<Self> {
        match serde_json::from_value(document.clone()) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Skipping malformed user document: {}", e);
                None
            }
        }
    }
}

/// The subset of the auth provider's identity the backend persists. The
/// auth service itself is an external capability; this is only the handoff.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthIdentity {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub provider: String,
}
