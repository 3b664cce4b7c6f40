//! # Storage Traits
//!
//! The interface the domain layer holds against the record store. Each
//! collection gets one trait, shaped by the store's five primitive
//! operations: insert, whole-field replace, atomic numeric increment,
//! delete, and subscribe-to-query.
//!
//! The two counters that race under concurrent writes — a challenge's
//! `currentAmount` and a user's `xp` — are only reachable through the
//! increment methods. There is deliberately no way to write either field
//! wholesale from the domain layer.

use anyhow::Result;

use crate::domain::models::challenge::Challenge;
use crate::domain::models::onboarding::OnboardingResponse;
use crate::domain::models::transaction::Transaction;
use crate::domain::models::user::UserProfile;
use crate::storage::subscription::Subscription;

/// Store operations for the `transactions` collection.
pub trait TransactionStore: Send + Sync {
    /// Insert a new transaction. The store assigns the document id and
    /// returns it; any id on the passed record is ignored.
    fn store_transaction(&self, transaction: &Transaction) -> Result<String>;

    fn get_transaction(&self, user_id: &str, transaction_id: &str)
        -> Result<Option<Transaction>>;

    /// All of one user's decodable transactions, in no particular order.
    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;

    /// Wholesale overwrite of one transaction's `amount` — the only
    /// permitted edit of a stored transaction. Returns `false` when the
    /// document does not exist.
    fn replace_amount(&self, user_id: &str, transaction_id: &str, new_amount: f64)
        -> Result<bool>;

    /// Returns `false` when the document does not exist.
    fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<bool>;

    /// Live query over one user's transactions.
    fn subscribe_transactions(&self, user_id: &str) -> Result<Subscription<Transaction>>;
}

/// Store operations for the `user_challenges` collection.
pub trait ChallengeStore: Send + Sync {
    /// Insert a new challenge; the store assigns and returns the id.
    fn store_challenge(&self, challenge: &Challenge) -> Result<String>;

    fn get_challenge(&self, user_id: &str, challenge_id: &str) -> Result<Option<Challenge>>;

    /// One user's challenges with `active` status.
    fn list_active_challenges(&self, user_id: &str) -> Result<Vec<Challenge>>;

    /// Atomically add `delta` to `currentAmount` and return the updated
    /// record. The new value is computed inside the store, never from a
    /// possibly-stale read on the client side, so two racing contributions
    /// both land. Returns `None` when the document does not exist.
    fn increment_current_amount(
        &self,
        user_id: &str,
        challenge_id: &str,
        delta: f64,
    ) -> Result<Option<Challenge>>;

    /// Returns `false` when the document does not exist.
    fn delete_challenge(&self, user_id: &str, challenge_id: &str) -> Result<bool>;

    /// Live query over one user's active challenges.
    fn subscribe_active_challenges(&self, user_id: &str) -> Result<Subscription<Challenge>>;
}

/// Store operations for the `users` collection, keyed by auth uid.
pub trait UserStore: Send + Sync {
    /// Insert the profile unless a document with its id already exists.
    /// Returns `true` when the insert happened — the create-if-absent
    /// check and the insert are one atomic step.
    fn insert_user_if_absent(&self, profile: &UserProfile) -> Result<bool>;

    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Atomically add `delta` to the profile's `xp` and return the new
    /// value, or `None` when no such user exists.
    fn increment_xp(&self, user_id: &str, delta: i64) -> Result<Option<i64>>;
}

/// Store operations for the `onboarding_responses` collection.
pub trait OnboardingResponseStore: Send + Sync {
    /// Insert a finalized snapshot; the store assigns and returns the id.
    fn store_response(&self, response: &OnboardingResponse) -> Result<String>;

    fn list_responses(&self) -> Result<Vec<OnboardingResponse>>;
}

/// Factory seam for storage backends.
///
/// The domain layer works against any backend that can hand out the four
/// repositories; swapping the JSON reference implementation for a real
/// hosted store is a matter of implementing this trait.
pub trait Connection: Send + Sync + Clone {
    type TransactionRepository: TransactionStore + Clone;
    type ChallengeRepository: ChallengeStore + Clone;
    type UserRepository: UserStore + Clone;
    type OnboardingRepository: OnboardingResponseStore + Clone;

    fn create_transaction_repository(&self) -> Self::TransactionRepository;
    fn create_challenge_repository(&self) -> Self::ChallengeRepository;
    fn create_user_repository(&self) -> Self::UserRepository;
    fn create_onboarding_repository(&self) -> Self::OnboardingRepository;
}
