//! Transaction service: record, correct, and delete ledger entries.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{FixedOffset, Utc};
use log::info;

use crate::domain::catalog;
use crate::domain::commands::transactions::{
    CreateTransactionCommand, CreateTransactionResult, DeleteTransactionsCommand,
    DeleteTransactionsResult, UpdateTransactionAmountCommand,
};
use crate::domain::models::transaction::{Transaction, TransactionValidationError};
use crate::domain::user_service::UserService;
use crate::storage::subscription::Subscription;
use crate::storage::traits::{Connection, TransactionStore};

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    user_service: UserService<C>,
    reference_offset: FixedOffset,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(
        connection: Arc<C>,
        user_service: UserService<C>,
        reference_offset: FixedOffset,
    ) -> Self {
        Self {
            transaction_repository: connection.create_transaction_repository(),
            user_service,
            reference_offset,
        }
    }

    /// Record a new transaction and grant the matching XP.
    ///
    /// The record denormalizes its category's icon and color at creation
    /// time; `date` defaults to now but may be backdated by the caller,
    /// while `created_at` is always the write instant.
    pub fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> Result<CreateTransactionResult> {
        let category = validate_create(&command)?;

        let now = Utc::now().with_timezone(&self.reference_offset);
        let mut transaction = Transaction {
            id: String::new(),
            user_id: command.user_id.clone(),
            transaction_type: command.transaction_type,
            amount: command.amount,
            category: category.name.to_string(),
            category_icon: category.icon.to_string(),
            category_color: category.color.to_string(),
            description: command.description.trim().to_string(),
            details: command.details,
            is_fixed: command.is_fixed,
            date: command.date.unwrap_or(now),
            created_at: now,
        };

        transaction.id = self.transaction_repository.store_transaction(&transaction)?;
        info!(
            "Recorded {} of {} for {}",
            transaction.transaction_type.as_str(),
            transaction.amount,
            transaction.user_id
        );

        let xp_awarded = self
            .user_service
            .award_transaction_xp(&command.user_id, command.transaction_type)?;

        Ok(CreateTransactionResult { transaction, xp_awarded })
    }

    /// Correct a transaction's amount wholesale — the only permitted edit.
    pub fn update_amount(&self, command: UpdateTransactionAmountCommand) -> Result<()> {
        if !command.new_amount.is_finite() {
            return Err(TransactionValidationError::NonFiniteAmount.into());
        }
        if command.new_amount <= 0.0 {
            return Err(TransactionValidationError::NonPositiveAmount.into());
        }

        let found = self.transaction_repository.replace_amount(
            &command.user_id,
            &command.transaction_id,
            command.new_amount,
        )?;
        if !found {
            return Err(anyhow!("Transaction {} not found", command.transaction_id));
        }
        Ok(())
    }

    /// Delete one transaction. Returns `false` when it did not exist.
    pub fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<bool> {
        self.transaction_repository
            .delete_transaction(user_id, transaction_id)
    }

    /// Delete a selection of transactions. Ids that no longer exist are
    /// reported back instead of failing the rest of the batch — each
    /// delete is its own independent store operation.
    pub fn delete_transactions(
        &self,
        command: DeleteTransactionsCommand,
    ) -> Result<DeleteTransactionsResult> {
        let mut deleted_count = 0;
        let mut not_found_ids = Vec::new();

        for transaction_id in &command.transaction_ids {
            if self
                .transaction_repository
                .delete_transaction(&command.user_id, transaction_id)?
            {
                deleted_count += 1;
            } else {
                not_found_ids.push(transaction_id.clone());
            }
        }

        info!(
            "Deleted {}/{} transactions for {}",
            deleted_count,
            command.transaction_ids.len(),
            command.user_id
        );
        Ok(DeleteTransactionsResult {
            deleted_count,
            not_found_ids,
            success_message: format!("{} transactions deleted", deleted_count),
        })
    }

    /// Live query over the user's transactions, for screens that rerender
    /// their aggregates on every store change.
    pub fn subscribe(&self, user_id: &str) -> Result<Subscription<Transaction>> {
        self.transaction_repository.subscribe_transactions(user_id)
    }
}

/// Validate a create command and resolve its catalog category.
fn validate_create(
    command: &CreateTransactionCommand,
) -> Result<&'static catalog::CategoryDef, TransactionValidationError> {
    if !command.amount.is_finite() {
        return Err(TransactionValidationError::NonFiniteAmount);
    }
    if command.amount <= 0.0 {
        return Err(TransactionValidationError::NonPositiveAmount);
    }
    let description = command.description.trim();
    if description.is_empty() || description.len() > 256 {
        return Err(TransactionValidationError::InvalidDescription);
    }
    catalog::find_category(command.transaction_type, &command.category).ok_or_else(|| {
        TransactionValidationError::UnknownCategory {
            transaction_type: command.transaction_type.as_str(),
            category: command.category.clone(),
        }
    })
}
