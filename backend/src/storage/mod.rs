//! # Storage Module
//!
//! The record-store abstraction and its backends. The domain layer only
//! ever sees the traits in [`traits`]; the JSON backend in [`json`] is the
//! reference implementation used by tests and local runs, standing in for
//! the hosted document database.

pub mod json;
pub mod subscription;
pub mod traits;

pub use json::JsonConnection;
pub use subscription::Subscription;
pub use traits::{
    ChallengeStore, Connection, OnboardingResponseStore, TransactionStore, UserStore,
};
