//! JSON-backed repository for the `onboarding_responses` collection.

use anyhow::Result;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::onboarding::OnboardingResponse;
use crate::storage::traits::OnboardingResponseStore;

use super::connection::JsonConnection;

pub const COLLECTION: &str = "onboarding_responses";

#[derive(Clone)]
pub struct OnboardingRepository {
    connection: JsonConnection,
}

impl OnboardingRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

impl OnboardingResponseStore for OnboardingRepository {
    fn store_response(&self, response: &OnboardingResponse) -> Result<String> {
        let id = format!("onb-{}", Uuid::new_v4());
        let mut document = serde_json::to_value(response)?;
        document["id"] = Value::String(id.clone());

        self.connection.mutate(COLLECTION, |documents| {
            documents.push(document);
            Ok(())
        })?;
        Ok(id)
    }

    fn list_responses(&self) -> Result<Vec<OnboardingResponse>> {
        let documents = self.connection.documents(COLLECTION)?;
        Ok(documents
            .iter()
            .filter_map(OnboardingResponse::from_document)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::onboarding::{OnboardingState, OnboardingStep};
    use crate::storage::json::test_utils::temp_connection;
    use serde_json::json;

    #[test]
    fn stores_and_lists_partial_snapshots() {
        let (_dir, connection) = temp_connection();
        let repository = OnboardingRepository::new(connection);

        let mut state = OnboardingState::new();
        state.set(OnboardingStep::Step1, json!({"id": "1"}));
        state.set(OnboardingStep::Step3, json!({"viewed": true}));

        let response = OnboardingResponse {
            id: String::new(),
            state: state.finalize(),
            created_at: "2024-03-01T10:00:00-03:00".parse().unwrap(),
        };
        let id = repository.store_response(&response).unwrap();
        assert!(id.starts_with("onb-"));

        let listed = repository.list_responses().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert!(listed[0].state.step1.is_some());
        assert!(listed[0].state.step2.is_none());
    }
}
