//! Onboarding service: the one-time writes that close the wizard.

use std::sync::Arc;

use anyhow::Result;
use chrono::{FixedOffset, Utc};
use log::info;

use crate::domain::commands::onboarding::{
    CompleteOnboardingCommand, CompleteOnboardingResult,
};
use crate::domain::models::onboarding::OnboardingResponse;
use crate::domain::user_service::UserService;
use crate::storage::traits::{Connection, OnboardingResponseStore};

#[derive(Clone)]
pub struct OnboardingService<C: Connection> {
    onboarding_repository: C::OnboardingRepository,
    user_service: UserService<C>,
    reference_offset: FixedOffset,
}

impl<C: Connection> OnboardingService<C> {
    pub fn new(
        connection: Arc<C>,
        user_service: UserService<C>,
        reference_offset: FixedOffset,
    ) -> Self {
        Self {
            onboarding_repository: connection.create_onboarding_repository(),
            user_service,
            reference_offset,
        }
    }

    /// Finish the wizard: snapshot the accumulator, persist the response
    /// record, and create the user document carrying the same snapshot.
    ///
    /// Partial states go through unchanged — unset slots are stored as
    /// nulls, never rejected. The accumulator itself is left intact; its
    /// lifetime is the caller's wizard flow.
    pub fn complete_onboarding(
        &self,
        command: CompleteOnboardingCommand,
    ) -> Result<CompleteOnboardingResult> {
        let snapshot = command.state.finalize();
        info!(
            "Completing onboarding for {} with {}/5 steps answered",
            command.identity.uid,
            snapshot.answered_count()
        );

        let response = OnboardingResponse {
            id: String::new(),
            state: snapshot.clone(),
            created_at: Utc::now().with_timezone(&self.reference_offset),
        };
        let response_id = self.onboarding_repository.store_response(&response)?;

        let ensured = self.user_service.ensure_user(command.identity, snapshot)?;

        Ok(CompleteOnboardingResult {
            user: ensured.user,
            created: ensured.created,
            response_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::onboarding::{OnboardingState, OnboardingStep};
    use crate::domain::models::user::AuthIdentity;
    use crate::storage::json::test_utils::temp_connection;
    use crate::storage::JsonConnection;
    use serde_json::json;

    fn service() -> (tempfile::TempDir, OnboardingService<JsonConnection>) {
        let (dir, connection) = temp_connection();
        let connection = Arc::new(connection);
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let user_service = UserService::new(connection.clone(), offset);
        (dir, OnboardingService::new(connection, user_service, offset))
    }

    fn identity() -> AuthIdentity {
        AuthIdentity {
            uid: "uid-1".to_string(),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            provider: "phone".to_string(),
        }
    }

    #[test]
    fn completes_with_a_partial_state() {
        let (_dir, service) = service();

        let mut state = OnboardingState::new();
        state.set(OnboardingStep::Step1, json!({"id": "1", "title": "Aprender a Investir"}));
        state.set(OnboardingStep::Step3, json!({"viewed": true}));

        let result = service
            .complete_onboarding(CompleteOnboardingCommand {
                identity: identity(),
                state: state.clone(),
            })
            .unwrap();

        assert!(result.created);
        assert!(result.response_id.starts_with("onb-"));
        assert_eq!(result.user.onboarding.answered_count(), 2);
        assert!(result.user.onboarding.step2.is_none());

        // The accumulator still belongs to the wizard and is untouched.
        assert_eq!(state.answered_count(), 2);
    }

    #[test]
    fn a_second_completion_keeps_the_existing_user() {
        let (_dir, service) = service();

        let mut first = OnboardingState::new();
        first.set(OnboardingStep::Step5, json!({"id": "2", "title": "Controle Financeiro"}));
        service
            .complete_onboarding(CompleteOnboardingCommand {
                identity: identity(),
                state: first,
            })
            .unwrap();

        let result = service
            .complete_onboarding(CompleteOnboardingCommand {
                identity: identity(),
                state: OnboardingState::new(),
            })
            .unwrap();

        assert!(!result.created);
        // First snapshot wins on the user document.
        assert_eq!(result.user.onboarding.answered_count(), 1);

        // Each wizard run still leaves its own response record.
        let responses = service.onboarding_repository.list_responses().unwrap();
        assert_eq!(responses.len(), 2);
    }
}
