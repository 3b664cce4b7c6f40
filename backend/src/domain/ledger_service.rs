//! Ledger service: the read-side queries every screen derives its numbers
//! from. All heavy lifting happens in the pure functions of
//! [`crate::domain::ledger`]; this service only fetches the snapshot and
//! delegates.

use std::sync::Arc;

use anyhow::Result;
use chrono::FixedOffset;
use shared::{LedgerSummary, TransactionDaySection};

use crate::domain::calendar::MonthWindow;
use crate::domain::commands::ledger::{
    DaySectionsQuery, MonthlySummaryQuery, RecentTransactionsQuery,
};
use crate::domain::ledger;
use crate::storage::traits::{Connection, TransactionStore};

#[derive(Clone)]
pub struct LedgerService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    reference_offset: FixedOffset,
}

impl<C: Connection> LedgerService<C> {
    pub fn new(connection: Arc<C>, reference_offset: FixedOffset) -> Self {
        Self {
            transaction_repository: connection.create_transaction_repository(),
            reference_offset,
        }
    }

    /// One calendar month's aggregate figures for a user.
    pub fn monthly_summary(&self, query: MonthlySummaryQuery) -> Result<LedgerSummary> {
        let window = MonthWindow::for_month(query.year, query.month, self.reference_offset)?;
        let transactions = self.transaction_repository.list_transactions(&query.user_id)?;
        Ok(ledger::aggregate(&transactions, &window))
    }

    /// The unwindowed running balance — the "current balance" headline,
    /// independent of any month filter.
    pub fn current_balance(&self, user_id: &str) -> Result<f64> {
        let transactions = self.transaction_repository.list_transactions(user_id)?;
        Ok(ledger::running_balance(&transactions))
    }

    /// The most recent transactions for compact list widgets.
    pub fn recent_transactions(
        &self,
        query: RecentTransactionsQuery,
    ) -> Result<Vec<shared::Transaction>> {
        let transactions = self.transaction_repository.list_transactions(&query.user_id)?;
        Ok(ledger::recent(&transactions, query.limit))
    }

    /// Day-sectioned transactions for the main list screen, optionally
    /// narrowed by the search box.
    pub fn day_sections(&self, query: DaySectionsQuery) -> Result<Vec<TransactionDaySection>> {
        let mut transactions = self.transaction_repository.list_transactions(&query.user_id)?;
        if let Some(search) = &query.search {
            let search = search.trim();
            if !search.is_empty() {
                transactions.retain(|t| ledger::matches_search(t, search));
            }
        }
        Ok(ledger::day_sections(&transactions))
    }
}
