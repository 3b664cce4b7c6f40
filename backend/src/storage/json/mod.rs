//! # JSON Storage Module
//!
//! A file-based document store standing in for the hosted database. It
//! demonstrates that the domain layer is storage-agnostic: the same traits
//! could be backed by a remote document service without touching a single
//! service.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── transactions.json
//! ├── user_challenges.json
//! ├── users.json
//! └── onboarding_responses.json
//! ```
//!
//! Each file holds a JSON array of documents. Writes are atomic (temp file
//! plus rename), every collection is guarded by one lock so the increment
//! operations are true read-modify-writes inside the store, and every
//! mutation pushes fresh snapshots to live subscribers.

pub mod challenge_repository;
pub mod connection;
pub mod onboarding_repository;
pub mod transaction_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_utils;

pub use challenge_repository::ChallengeRepository;
pub use connection::JsonConnection;
pub use onboarding_repository::OnboardingRepository;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;
