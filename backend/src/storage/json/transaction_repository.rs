//! JSON-backed repository for the `transactions` collection.

use anyhow::{anyhow, Result};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::transaction::Transaction;
use crate::storage::subscription::Subscription;
use crate::storage::traits::TransactionStore;

use super::connection::JsonConnection;

pub const COLLECTION: &str = "transactions";

#[derive(Clone)]
pub struct TransactionRepository {
    connection: JsonConnection,
}

impl TransactionRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn owned_by(document: &Value, user_id: &str) -> bool {
        document.get("userId").and_then(Value::as_str) == Some(user_id)
    }

    fn has_id(document: &Value, id: &str) -> bool {
        document.get("id").and_then(Value::as_str) == Some(id)
    }
}

impl TransactionStore for TransactionRepository {
    fn store_transaction(&self, transaction: &Transaction) -> Result<String> {
        let id = format!("tx-{}", Uuid::new_v4());
        let mut document = serde_json::to_value(transaction)?;
        document["id"] = Value::String(id.clone());

        self.connection.mutate(COLLECTION, |documents| {
            documents.push(document);
            Ok(())
        })?;
        Ok(id)
    }

    fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        let documents = self.connection.documents(COLLECTION)?;
        Ok(documents
            .iter()
            .find(|doc| Self::has_id(doc, transaction_id) && Self::owned_by(doc, user_id))
            .and_then(Transaction::from_document))
    }

    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let documents = self.connection.documents(COLLECTION)?;
        Ok(documents
            .iter()
            .filter(|doc| Self::owned_by(doc, user_id))
            .filter_map(Transaction::from_document)
            .collect())
    }

    fn replace_amount(
        &self,
        user_id: &str,
        transaction_id: &str,
        new_amount: f64,
    ) -> Result<bool> {
        self.connection.mutate(COLLECTION, |documents| {
            match documents
                .iter_mut()
                .find(|doc| Self::has_id(doc, transaction_id) && Self::owned_by(doc, user_id))
            {
                Some(document) => {
                    let amount = serde_json::Number::from_f64(new_amount)
                        .ok_or_else(|| anyhow!("Amount {} is not representable", new_amount))?;
                    document["amount"] = Value::Number(amount);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<bool> {
        self.connection.mutate(COLLECTION, |documents| {
            let before = documents.len();
            documents
                .retain(|doc| !(Self::has_id(doc, transaction_id) && Self::owned_by(doc, user_id)));
            Ok(documents.len() < before)
        })
    }

    fn subscribe_transactions(&self, user_id: &str) -> Result<Subscription<Transaction>> {
        let receiver = self.connection.subscribe(COLLECTION, Some(user_id))?;
        Ok(Subscription::new(receiver, Transaction::from_document))
    }
}
