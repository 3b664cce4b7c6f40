//! Domain model for a transaction record.

use chrono::{DateTime, FixedOffset};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a transaction adds to or subtracts from the balance.
///
/// The sign of a movement comes from this tag alone; `amount` is always
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// A single transaction document from the `transactions` collection.
///
/// Field names mirror the stored document shape (camelCase, `type` tag).
/// Records are immutable once created except for wholesale edits of
/// `amount`; everything else only ever gets deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub category: String,
    /// Presentation metadata denormalized from the category catalog at
    /// creation time; never consulted by aggregation.
    pub category_icon: String,
    pub category_color: String,
    pub description: String,
    #[serde(default)]
    pub details: String,
    /// Recurring-transaction indicator. Stored but inert: no recurrence
    /// expansion exists anywhere in the system.
    #[serde(default)]
    pub is_fixed: bool,
    /// Timestamp the transaction is attributed to.
    pub date: DateTime<FixedOffset>,
    /// Timestamp of record creation; may differ from `date`.
    pub created_at: DateTime<FixedOffset>,
}

impl Transaction {
    /// Decode a raw store document into a typed record.
    ///
    /// Returns `None` (after logging) for documents that are missing
    /// required fields or violate the `amount >= 0` invariant. Callers
    /// treat a `None` as "this record does not exist" — the silent-skip
    /// policy of the store boundary.
    pub fn from_document(document: &Value) -> Option<Self> {
        let transaction: Transaction = match serde_json::from_value(document.clone()) {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping malformed transaction document: {}", e);
                return None;
            }
        };

        if !transaction.amount.is_finite() || transaction.amount < 0.0 {
            warn!(
                "Skipping transaction {} with invalid amount {}",
                transaction.id, transaction.amount
            );
            return None;
        }

        Some(transaction)
    }
}

impl From<&Transaction> for shared::Transaction {
    fn from(t: &Transaction) -> Self {
        shared::Transaction {
            id: t.id.clone(),
            transaction_type: match t.transaction_type {
                TransactionType::Income => shared::TransactionType::Income,
                TransactionType::Expense => shared::TransactionType::Expense,
            },
            amount: t.amount,
            description: t.description.clone(),
            category: t.category.clone(),
            category_icon: t.category_icon.clone(),
            category_color: t.category_color.clone(),
            is_fixed: t.is_fixed,
            date: t.date.to_rfc3339(),
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Validation failures when creating or editing a transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionValidationError {
    #[error("Amount must be a positive number")]
    NonPositiveAmount,
    #[error("Amount must be a finite number")]
    NonFiniteAmount,
    #[error("Description must be between 1 and 256 characters")]
    InvalidDescription,
    #[error("Unknown {transaction_type} category: {category}")]
    UnknownCategory {
        transaction_type: &'static str,
        category: String,
    },
}
