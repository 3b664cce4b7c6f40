//! JSON-backed repository for the `users` collection.
//!
//! Unlike the other collections, user documents are keyed by the auth
//! provider's uid — the store never assigns an id here.

use anyhow::Result;
use serde_json::Value;

use crate::domain::models::user::UserProfile;
use crate::storage::traits::UserStore;

use super::connection::JsonConnection;

pub const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct UserRepository {
    connection: JsonConnection,
}

impl UserRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn has_id(document: &Value, id: &str) -> bool {
        document.get("id").and_then(Value::as_str) == Some(id)
    }
}

impl UserStore for UserRepository {
    fn insert_user_if_absent(&self, profile: &UserProfile) -> Result<bool> {
        let document = serde_json::to_value(profile)?;
        self.connection.mutate(COLLECTION, |documents| {
            if documents.iter().any(|doc| Self::has_id(doc, &profile.id)) {
                return Ok(false);
            }
            documents.push(document);
            Ok(true)
        })
    }

    fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let documents = self.connection.documents(COLLECTION)?;
        Ok(documents
            .iter()
            .find(|doc| Self::has_id(doc, user_id))
            .and_then(UserProfile::from_document))
    }

    fn increment_xp(&self, user_id: &str, delta: i64) -> Result<Option<i64>> {
        self.connection.mutate(COLLECTION, |documents| {
            let document = match documents.iter_mut().find(|doc| Self::has_id(doc, user_id)) {
                Some(document) => document,
                None => return Ok(None),
            };

            let current = document.get("xp").and_then(Value::as_i64).unwrap_or(0);
            let updated = current + delta;
            document["xp"] = Value::from(updated);
            Ok(Some(updated))
        })
    }
}
