//! # Finan Backend
//!
//! Domain layer of the Finan personal-finance app: transactions, monthly
//! ledger aggregation, savings challenges, onboarding, and user profiles,
//! all over a pluggable document store.
//!
//! The crate exposes no wire or CLI surface — presentation code links it
//! in-process, subscribes to live record snapshots, and re-derives what it
//! renders from each snapshot with the pure functions in
//! [`domain::ledger`] and [`domain::challenge_service`].

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::FixedOffset;

pub mod domain;
pub mod storage;

pub use storage::JsonConnection;

/// Reference offset used when none is configured: Brasília time (UTC-3),
/// where the app's users live.
fn default_offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("static offset is valid")
}

/// Main backend struct that wires all services over one store connection.
pub struct Backend {
    pub user_service: domain::UserService<JsonConnection>,
    pub transaction_service: domain::TransactionService<JsonConnection>,
    pub ledger_service: domain::LedgerService<JsonConnection>,
    pub challenge_service: domain::ChallengeService<JsonConnection>,
    pub onboarding_service: domain::OnboardingService<JsonConnection>,
}

impl Backend {
    /// Open a backend over a data directory, in the default reference
    /// offset.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_offset(data_dir, default_offset())
    }

    /// Open a backend with an explicit reference offset for month windows
    /// and record timestamps.
    pub fn with_offset(data_dir: impl AsRef<Path>, offset: FixedOffset) -> Result<Self> {
        let connection = Arc::new(JsonConnection::new(data_dir.as_ref())?);

        let user_service = domain::UserService::new(connection.clone(), offset);
        let transaction_service =
            domain::TransactionService::new(connection.clone(), user_service.clone(), offset);
        let ledger_service = domain::LedgerService::new(connection.clone(), offset);
        let challenge_service = domain::ChallengeService::new(connection.clone(), offset);
        let onboarding_service =
            domain::OnboardingService::new(connection, user_service.clone(), offset);

        Ok(Backend {
            user_service,
            transaction_service,
            ledger_service,
            challenge_service,
            onboarding_service,
        })
    }
}
