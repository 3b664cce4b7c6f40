//! User profile service: account-creation writes and XP awards.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{FixedOffset, Utc};
use log::{info, warn};

use crate::domain::commands::users::EnsureUserResult;
use crate::domain::models::onboarding::OnboardingState;
use crate::domain::models::transaction::TransactionType;
use crate::domain::models::user::{AuthIdentity, UserProfile};
use crate::storage::traits::{Connection, UserStore};

/// XP granted for recording an income transaction.
const INCOME_XP: i64 = 10;
/// XP granted for recording an expense transaction.
const EXPENSE_XP: i64 = 2;

#[derive(Clone)]
pub struct UserService<C: Connection> {
    user_repository: C::UserRepository,
    reference_offset: FixedOffset,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: Arc<C>, reference_offset: FixedOffset) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
            reference_offset,
        }
    }

    /// Create the user document for an auth identity unless it already
    /// exists. The check and the insert are one atomic store operation, so
    /// two racing sign-ins cannot produce two documents; the first write
    /// wins and its onboarding snapshot is the one kept.
    pub fn ensure_user(
        &self,
        identity: AuthIdentity,
        onboarding: OnboardingState,
    ) -> Result<EnsureUserResult> {
        let profile = UserProfile {
            id: identity.uid.clone(),
            name: identity.name,
            email: identity.email,
            provider: identity.provider,
            xp: 0,
            onboarding,
            created_at: Utc::now().with_timezone(&self.reference_offset),
        };

        if self.user_repository.insert_user_if_absent(&profile)? {
            info!("Created user document for {}", profile.id);
            return Ok(EnsureUserResult { user: profile, created: true });
        }

        let existing = self
            .user_repository
            .get_user(&identity.uid)?
            .ok_or_else(|| anyhow!("User {} exists but could not be read back", identity.uid))?;
        Ok(EnsureUserResult { user: existing, created: false })
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.user_repository.get_user(user_id)
    }

    /// Grant the XP for a recorded transaction via the store's atomic
    /// increment. Returns the amount granted; a missing profile grants
    /// nothing rather than failing the transaction that triggered it.
    pub fn award_transaction_xp(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
    ) -> Result<i64> {
        let delta = match transaction_type {
            TransactionType::Income => INCOME_XP,
            TransactionType::Expense => EXPENSE_XP,
        };

        match self.user_repository.increment_xp(user_id, delta)? {
            Some(new_xp) => {
                info!("Awarded {} XP to {} (now {})", delta, user_id, new_xp);
                Ok(delta)
            }
            None => {
                warn!("No user document for {}; skipping XP award", user_id);
                Ok(0)
            }
        }
    }
}
