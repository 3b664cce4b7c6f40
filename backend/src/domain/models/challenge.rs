//! Domain model for a savings challenge record.

use chrono::{DateTime, FixedOffset};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a challenge. Only `Active` challenges are queried by
/// the app; the other states exist so history is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Archived,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::Archived => "archived",
        }
    }
}

/// A document from the `user_challenges` collection.
///
/// `current_amount` is deliberately unclamped at this layer: over-saved
/// (`current > goal`) and over-withdrawn (`current < 0`) are both valid
/// stored states. Only the displayed completion percentage is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub user_id: String,
    /// Catalog template this challenge was started from, if any.
    #[serde(default)]
    pub template_id: Option<String>,
    pub title: String,
    pub icon_name: String,
    pub icon_type: String,
    pub color: String,
    pub goal_amount: f64,
    pub current_amount: f64,
    pub status: ChallengeStatus,
    pub created_at: DateTime<FixedOffset>,
}

impl Challenge {
    /// Decode a raw store document, skipping malformed ones with a warning.
    pub fn from_document(document: &Value) -> Option<Self> {
        let challenge: Challenge = match serde_json::from_value(document.clone()) {
            Ok(c) => c,
            Err(e) => {
                warn!("Skipping malformed challenge document: {}", e);
                return None;
            }
        };

        if !challenge.goal_amount.is_finite() || !challenge.current_amount.is_finite() {
            warn!(
                "Skipping challenge {} with non-finite amounts",
                challenge.id
            );
            return None;
        }

        Some(challenge)
    }
}

/// How a contribution was confirmed by the caller. Withdrawals require the
/// explicit mode selection; a bare negative number is never accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionMode {
    Deposit,
    Withdrawal,
}

/// Input errors for challenge contributions. Reported synchronously to the
/// caller and never retried.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ContributionError {
    #[error("Contribution amount cannot be zero")]
    ZeroAmount,
    #[error("Contribution amount must be a finite number")]
    NonNumericAmount,
    #[error("Contribution amount must be given as a positive magnitude")]
    NegativeAmount,
}

/// Validation failures when starting a challenge.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeValidationError {
    #[error("Unknown challenge template: {0}")]
    UnknownTemplate(String),
    #[error("Goal amount must be positive")]
    NonPositiveGoal,
    #[error("Challenge title cannot be empty")]
    EmptyTitle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "id": "ch-1",
            "userId": "user-1",
            "templateId": "guardando-dinheiro",
            "title": "Guardando Dinheiro",
            "iconName": "piggy-bank",
            "iconType": "MaterialCommunityIcons",
            "color": "#3b82f6",
            "goalAmount": 1000.0,
            "currentAmount": 250.0,
            "status": "active",
            "createdAt": "2024-03-01T09:00:00-03:00"
        })
    }

    #[test]
    fn decodes_a_well_formed_document() {
        let challenge = Challenge::from_document(&document()).unwrap();
        assert_eq!(challenge.status, ChallengeStatus::Active);
        assert_eq!(challenge.goal_amount, 1000.0);
        assert_eq!(challenge.template_id.as_deref(), Some("guardando-dinheiro"));
    }

    #[test]
    fn negative_current_amount_is_a_valid_stored_state() {
        let mut doc = document();
        doc["currentAmount"] = json!(-50.0);
        let challenge = Challenge::from_document(&doc).unwrap();
        assert_eq!(challenge.current_amount, -50.0);
    }

    #[test]
    fn skips_documents_with_unknown_status() {
        let mut doc = document();
        doc["status"] = json!("paused");
        assert!(Challenge::from_document(&doc).is_none());
    }

    #[test]
    fn skips_documents_missing_goal() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("goalAmount");
        assert!(Challenge::from_document(&doc).is_none());
    }
}
