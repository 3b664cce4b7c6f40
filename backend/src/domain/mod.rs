//! # Domain Module
//!
//! Business logic for the Finan app: typed records, the pure ledger and
//! progress computations, and the services presentation code binds to.
//! Everything here is synchronous and storage-agnostic — services talk to
//! the record store only through the traits in [`crate::storage`].
//!
//! ## Module Organization
//!
//! - **models**: one typed record per collection, validated at the store
//!   boundary
//! - **catalog**: fixed app content (categories, challenge templates)
//! - **calendar**: calendar-month windows for aggregation
//! - **ledger**: pure aggregation over transaction snapshots
//! - **commands**: command/query/result types consumed by services
//! - **transaction_service / ledger_service / challenge_service /
//!   onboarding_service / user_service**: the operations themselves

pub mod calendar;
pub mod catalog;
pub mod challenge_service;
pub mod commands;
pub mod ledger;
pub mod ledger_service;
pub mod models;
pub mod onboarding_service;
pub mod transaction_service;
pub mod user_service;

pub use challenge_service::{completion_percent, contribution_delta, ChallengeService};
pub use ledger_service::LedgerService;
pub use onboarding_service::OnboardingService;
pub use transaction_service::TransactionService;
pub use user_service::UserService;
