//! Domain-level command and query types.
//!
//! These structs are what services accept and return inside the domain
//! layer. The presentation layer maps its own input shapes onto these; the
//! DTOs it renders live in the `shared` crate.

pub mod transactions {
    use chrono::{DateTime, FixedOffset};

    use crate::domain::models::transaction::{Transaction, TransactionType};

    /// Input for recording a new transaction.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub user_id: String,
        pub transaction_type: TransactionType,
        /// Positive magnitude; the direction comes from `transaction_type`.
        pub amount: f64,
        pub description: String,
        pub details: String,
        /// Must name a catalog category of the matching type.
        pub category: String,
        pub is_fixed: bool,
        /// Attribution timestamp; `None` means "now".
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Result of recording a transaction.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionResult {
        pub transaction: Transaction,
        /// XP granted for the action; `0` when the user profile is absent.
        pub xp_awarded: i64,
    }

    /// Input for the one permitted edit: a wholesale amount correction.
    #[derive(Debug, Clone)]
    pub struct UpdateTransactionAmountCommand {
        pub user_id: String,
        pub transaction_id: String,
        pub new_amount: f64,
    }

    /// Command for deleting several transactions in one user action.
    #[derive(Debug, Clone)]
    pub struct DeleteTransactionsCommand {
        pub user_id: String,
        pub transaction_ids: Vec<String>,
    }

    /// Result of a bulk delete.
    #[derive(Debug, Clone)]
    pub struct DeleteTransactionsResult {
        pub deleted_count: usize,
        pub not_found_ids: Vec<String>,
        pub success_message: String,
    }
}

pub mod ledger {
    /// Query for one calendar month's aggregate figures.
    #[derive(Debug, Clone)]
    pub struct MonthlySummaryQuery {
        pub user_id: String,
        pub year: i32,
        pub month: u32,
    }

    /// Query for the most recent N transactions.
    #[derive(Debug, Clone)]
    pub struct RecentTransactionsQuery {
        pub user_id: String,
        pub limit: usize,
    }

    /// Query for the sectioned transaction list, optionally filtered by
    /// the search box.
    #[derive(Debug, Clone, Default)]
    pub struct DaySectionsQuery {
        pub user_id: String,
        pub search: Option<String>,
    }
}

pub mod challenges {
    use crate::domain::models::challenge::{Challenge, ContributionMode};

    /// Input for starting a challenge from a catalog template.
    #[derive(Debug, Clone)]
    pub struct StartChallengeCommand {
        pub user_id: String,
        pub template_id: String,
        /// Overrides the template's default goal; required when the
        /// template has none (the free-form template).
        pub goal_amount: Option<f64>,
        /// Overrides the template title, for personalized goals.
        pub title: Option<String>,
    }

    /// Result of starting a challenge.
    #[derive(Debug, Clone)]
    pub struct StartChallengeResult {
        pub challenge: Challenge,
        pub success_message: String,
    }

    /// Input for a deposit into or withdrawal from a challenge. The mode
    /// is the caller's explicit confirmation of direction; `amount` is
    /// always a positive magnitude.
    #[derive(Debug, Clone)]
    pub struct ContributeCommand {
        pub user_id: String,
        pub challenge_id: String,
        pub amount: f64,
        pub mode: ContributionMode,
    }

    /// Result of a contribution.
    #[derive(Debug, Clone)]
    pub struct ContributeResult {
        pub challenge: Challenge,
        /// Display value, clamped to `[0, 100]`.
        pub completion_percent: f64,
    }
}

pub mod onboarding {
    use crate::domain::models::onboarding::OnboardingState;
    use crate::domain::models::user::{AuthIdentity, UserProfile};

    /// Input for the final wizard step: persist the snapshot and create
    /// the account's user document.
    #[derive(Debug, Clone)]
    pub struct CompleteOnboardingCommand {
        pub identity: AuthIdentity,
        pub state: OnboardingState,
    }

    /// Result of finishing onboarding.
    #[derive(Debug, Clone)]
    pub struct CompleteOnboardingResult {
        pub user: UserProfile,
        /// `false` when the auth identity already had a user document.
        pub created: bool,
        pub response_id: String,
    }
}

pub mod users {
    use crate::domain::models::user::UserProfile;

    /// Result of the create-if-absent user write.
    #[derive(Debug, Clone)]
    pub struct EnsureUserResult {
        pub user: UserProfile,
        pub created: bool,
    }
}
