//! JSON-backed repository for the `user_challenges` collection.

use anyhow::{anyhow, Result};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::challenge::{Challenge, ChallengeStatus};
use crate::storage::subscription::Subscription;
use crate::storage::traits::ChallengeStore;

use super::connection::JsonConnection;

pub const COLLECTION: &str = "user_challenges";

#[derive(Clone)]
pub struct ChallengeRepository {
    connection: JsonConnection,
}

impl ChallengeRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn owned_by(document: &Value, user_id: &str) -> bool {
        document.get("userId").and_then(Value::as_str) == Some(user_id)
    }

    fn has_id(document: &Value, id: &str) -> bool {
        document.get("id").and_then(Value::as_str) == Some(id)
    }

    /// Decode for the active-challenges live query: malformed documents are
    /// skipped as usual, non-active ones are filtered out.
    fn decode_active(document: &Value) -> Option<Challenge> {
        Challenge::from_document(document).filter(|c| c.status == ChallengeStatus::Active)
    }
}

impl ChallengeStore for ChallengeRepository {
    fn store_challenge(&self, challenge: &Challenge) -> Result<String> {
        let id = format!("ch-{}", Uuid::new_v4());
        let mut document = serde_json::to_value(challenge)?;
        document["id"] = Value::String(id.clone());

        self.connection.mutate(COLLECTION, |documents| {
            documents.push(document);
            Ok(())
        })?;
        Ok(id)
    }

    fn get_challenge(&self, user_id: &str, challenge_id: &str) -> Result<Option<Challenge>> {
        let documents = self.connection.documents(COLLECTION)?;
        Ok(documents
            .iter()
            .find(|doc| Self::has_id(doc, challenge_id) && Self::owned_by(doc, user_id))
            .and_then(Challenge::from_document))
    }

    fn list_active_challenges(&self, user_id: &str) -> Result<Vec<Challenge>> {
        let documents = self.connection.documents(COLLECTION)?;
        Ok(documents
            .iter()
            .filter(|doc| Self::owned_by(doc, user_id))
            .filter_map(Self::decode_active)
            .collect())
    }

    fn increment_current_amount(
        &self,
        user_id: &str,
        challenge_id: &str,
        delta: f64,
    ) -> Result<Option<Challenge>> {
        self.connection.mutate(COLLECTION, |documents| {
            let document = match documents
                .iter_mut()
                .find(|doc| Self::has_id(doc, challenge_id) && Self::owned_by(doc, user_id))
            {
                Some(document) => document,
                None => return Ok(None),
            };

            // The increment reads the stored value under the collection
            // lock; a missing field counts as zero, matching the store's
            // increment-on-absent semantics.
            let current = document
                .get("currentAmount")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let updated = serde_json::Number::from_f64(current + delta)
                .ok_or_else(|| anyhow!("Increment result is not representable"))?;
            document["currentAmount"] = Value::Number(updated);

            Ok(Challenge::from_document(document))
        })
    }

    fn delete_challenge(&self, user_id: &str, challenge_id: &str) -> Result<bool> {
        self.connection.mutate(COLLECTION, |documents| {
            let before = documents.len();
            documents
                .retain(|doc| !(Self::has_id(doc, challenge_id) && Self::owned_by(doc, user_id)));
            Ok(documents.len() < before)
        })
    }

    fn subscribe_active_challenges(&self, user_id: &str) -> Result<Subscription<Challenge>> {
        let receiver = self.connection.subscribe(COLLECTION, Some(user_id))?;
        Ok(Subscription::new(receiver, Self::decode_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::test_utils::temp_connection;

    fn challenge(user_id: &str, current: f64) -> Challenge {
        Challenge {
            id: String::new(),
            user_id: user_id.to_string(),
            template_id: Some("guardando-dinheiro".to_string()),
            title: "Guardando Dinheiro".to_string(),
            icon_name: "piggy-bank".to_string(),
            icon_type: "MaterialCommunityIcons".to_string(),
            color: "#3b82f6".to_string(),
            goal_amount: 1000.0,
            current_amount: current,
            status: ChallengeStatus::Active,
            created_at: "2024-03-01T09:00:00-03:00".parse().unwrap(),
        }
    }

    #[test]
    fn store_assigns_the_document_id() {
        let (_dir, connection) = temp_connection();
        let repository = ChallengeRepository::new(connection);

        let id = repository.store_challenge(&challenge("u1", 0.0)).unwrap();
        assert!(id.starts_with("ch-"));
        assert!(repository.get_challenge("u1", &id).unwrap().is_some());
    }

    #[test]
    fn increments_apply_as_deltas() {
        let (_dir, connection) = temp_connection();
        let repository = ChallengeRepository::new(connection);

        let id = repository.store_challenge(&challenge("u1", 250.0)).unwrap();
        repository.increment_current_amount("u1", &id, 100.0).unwrap();
        let updated = repository
            .increment_current_amount("u1", &id, -300.0)
            .unwrap()
            .unwrap();

        assert_eq!(updated.current_amount, 50.0);
    }

    #[test]
    fn increment_can_drive_the_stored_value_negative() {
        let (_dir, connection) = temp_connection();
        let repository = ChallengeRepository::new(connection);

        let id = repository.store_challenge(&challenge("u1", 250.0)).unwrap();
        let updated = repository
            .increment_current_amount("u1", &id, -300.0)
            .unwrap()
            .unwrap();

        // Over-withdrawn is a valid stored state; nothing clamps it.
        assert_eq!(updated.current_amount, -50.0);
    }

    #[test]
    fn increment_on_a_missing_challenge_returns_none() {
        let (_dir, connection) = temp_connection();
        let repository = ChallengeRepository::new(connection);
        assert!(repository
            .increment_current_amount("u1", "ch-none", 10.0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn only_active_challenges_are_listed() {
        let (_dir, connection) = temp_connection();
        let repository = ChallengeRepository::new(connection);

        repository.store_challenge(&challenge("u1", 0.0)).unwrap();
        let mut archived = challenge("u1", 500.0);
        archived.status = ChallengeStatus::Archived;
        repository.store_challenge(&archived).unwrap();

        let listed = repository.list_active_challenges("u1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ChallengeStatus::Active);
    }

    #[test]
    fn active_subscription_filters_non_active_records() {
        let (_dir, connection) = temp_connection();
        let repository = ChallengeRepository::new(connection);

        let subscription = repository.subscribe_active_challenges("u1").unwrap();
        assert_eq!(subscription.recv().unwrap().len(), 0);

        let mut completed = challenge("u1", 1200.0);
        completed.status = ChallengeStatus::Completed;
        repository.store_challenge(&completed).unwrap();
        assert_eq!(subscription.recv().unwrap().len(), 0);

        repository.store_challenge(&challenge("u1", 0.0)).unwrap();
        assert_eq!(subscription.recv().unwrap().len(), 1);
    }
}
