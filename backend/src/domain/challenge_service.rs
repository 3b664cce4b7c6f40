//! Challenge service: savings challenges and their progress tracking.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{FixedOffset, Utc};
use log::info;
use shared::ChallengeProgress;

use crate::domain::catalog;
use crate::domain::commands::challenges::{
    ContributeCommand, ContributeResult, StartChallengeCommand, StartChallengeResult,
};
use crate::domain::models::challenge::{
    Challenge, ChallengeStatus, ChallengeValidationError, ContributionError, ContributionMode,
};
use crate::storage::subscription::Subscription;
use crate::storage::traits::{ChallengeStore, Connection};

/// Display completion for a challenge: `clamp(current / goal, 0, 1) * 100`.
///
/// A non-positive (or non-finite) goal yields `0` rather than a division
/// by zero; an out-of-range stored amount — over-saved or over-withdrawn —
/// only ever clamps the display, never the stored value.
pub fn completion_percent(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 || !goal.is_finite() || !current.is_finite() {
        return 0.0;
    }
    (current / goal).clamp(0.0, 1.0) * 100.0
}

/// Turn a caller-confirmed contribution into the signed delta handed to
/// the store's atomic increment. `amount` is a positive magnitude; the
/// mode is the explicit deposit/withdraw selection required of the caller.
pub fn contribution_delta(
    amount: f64,
    mode: ContributionMode,
) -> Result<f64, ContributionError> {
    if !amount.is_finite() {
        return Err(ContributionError::NonNumericAmount);
    }
    if amount < 0.0 {
        return Err(ContributionError::NegativeAmount);
    }
    if amount == 0.0 {
        return Err(ContributionError::ZeroAmount);
    }
    Ok(match mode {
        ContributionMode::Deposit => amount,
        ContributionMode::Withdrawal => -amount,
    })
}

/// Map a stored challenge onto its display card.
pub fn to_progress(challenge: &Challenge) -> ChallengeProgress {
    ChallengeProgress {
        id: challenge.id.clone(),
        title: challenge.title.clone(),
        icon_name: challenge.icon_name.clone(),
        icon_type: challenge.icon_type.clone(),
        color: challenge.color.clone(),
        goal_amount: challenge.goal_amount,
        current_amount: challenge.current_amount,
        completion_percent: completion_percent(challenge.current_amount, challenge.goal_amount),
    }
}

#[derive(Clone)]
pub struct ChallengeService<C: Connection> {
    challenge_repository: C::ChallengeRepository,
    reference_offset: FixedOffset,
}

impl<C: Connection> ChallengeService<C> {
    pub fn new(connection: Arc<C>, reference_offset: FixedOffset) -> Self {
        Self {
            challenge_repository: connection.create_challenge_repository(),
            reference_offset,
        }
    }

    /// Start a challenge from a catalog template, beginning at zero.
    pub fn start_challenge(
        &self,
        command: StartChallengeCommand,
    ) -> Result<StartChallengeResult> {
        let template = catalog::find_template(&command.template_id).ok_or_else(|| {
            ChallengeValidationError::UnknownTemplate(command.template_id.clone())
        })?;

        let goal_amount = command.goal_amount.unwrap_or(template.default_goal);
        if goal_amount <= 0.0 || !goal_amount.is_finite() {
            return Err(ChallengeValidationError::NonPositiveGoal.into());
        }

        let title = command
            .title
            .unwrap_or_else(|| template.title.to_string());
        if title.trim().is_empty() {
            return Err(ChallengeValidationError::EmptyTitle.into());
        }

        let mut challenge = Challenge {
            id: String::new(),
            user_id: command.user_id,
            template_id: Some(template.id.to_string()),
            title: title.trim().to_string(),
            icon_name: template.icon.to_string(),
            icon_type: template.icon_type.to_string(),
            color: template.color.to_string(),
            goal_amount,
            current_amount: 0.0,
            status: ChallengeStatus::Active,
            created_at: Utc::now().with_timezone(&self.reference_offset),
        };
        challenge.id = self.challenge_repository.store_challenge(&challenge)?;

        info!(
            "Started challenge {} ({}) with goal {}",
            challenge.id, challenge.title, challenge.goal_amount
        );
        Ok(StartChallengeResult {
            challenge,
            success_message: "Challenge started".to_string(),
        })
    }

    /// Apply a confirmed deposit or withdrawal.
    ///
    /// The new amount is issued to the store as a delta, not computed from
    /// a read here — two contributions racing for the same challenge must
    /// both land. The stored value is free to exceed the goal or go
    /// negative; only the returned display percentage is clamped.
    pub fn contribute(&self, command: ContributeCommand) -> Result<ContributeResult> {
        let delta = contribution_delta(command.amount, command.mode)?;

        let challenge = self
            .challenge_repository
            .get_challenge(&command.user_id, &command.challenge_id)?
            .ok_or_else(|| anyhow!("Challenge {} not found", command.challenge_id))?;
        if challenge.status != ChallengeStatus::Active {
            return Err(anyhow!(
                "Challenge {} is not active",
                command.challenge_id
            ));
        }

        let updated = self
            .challenge_repository
            .increment_current_amount(&command.user_id, &command.challenge_id, delta)?
            .ok_or_else(|| anyhow!("Challenge {} not found", command.challenge_id))?;

        info!(
            "Applied {:+} to challenge {} (now {})",
            delta, updated.id, updated.current_amount
        );
        Ok(ContributeResult {
            completion_percent: completion_percent(updated.current_amount, updated.goal_amount),
            challenge: updated,
        })
    }

    /// The user's active challenges as display cards, newest first.
    pub fn list_challenges(&self, user_id: &str) -> Result<Vec<ChallengeProgress>> {
        let mut challenges = self.challenge_repository.list_active_challenges(user_id)?;
        challenges.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(challenges.iter().map(to_progress).collect())
    }

    /// Remove a challenge entirely. Returns `false` when it did not exist.
    pub fn delete_challenge(&self, user_id: &str, challenge_id: &str) -> Result<bool> {
        self.challenge_repository.delete_challenge(user_id, challenge_id)
    }

    /// Live query over the user's active challenges.
    pub fn subscribe(&self, user_id: &str) -> Result<Subscription<Challenge>> {
        self.challenge_repository.subscribe_active_challenges(user_id)
    }
}
