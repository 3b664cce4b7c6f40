//! The shared connection behind the JSON document store.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde_json::Value;

use crate::storage::traits::Connection;

/// One registered live query: snapshots of documents whose `userId` equals
/// `user_id` (or all documents when `None`) are pushed on every mutation.
struct SubscriberEntry {
    user_id: Option<String>,
    sender: Sender<Vec<Value>>,
}

#[derive(Default)]
struct CollectionState {
    loaded: bool,
    documents: Vec<Value>,
    subscribers: Vec<SubscriberEntry>,
}

struct Inner {
    data_dir: PathBuf,
    collections: Mutex<HashMap<String, CollectionState>>,
}

/// Connection to a directory of per-collection JSON files.
///
/// Cloning is cheap and clones share state, so every repository created
/// from one connection sees the same documents and the same subscriber
/// registry.
#[derive(Clone)]
pub struct JsonConnection {
    inner: Arc<Inner>,
}

impl JsonConnection {
    /// Open (or create) a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        Ok(JsonConnection {
            inner: Arc::new(Inner {
                data_dir,
                collections: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.data_dir
    }

    /// Snapshot of every document in a collection.
    pub(crate) fn documents(&self, collection: &str) -> Result<Vec<Value>> {
        let mut collections = self.lock_collections();
        let state = self.loaded_state(&mut collections, collection)?;
        Ok(state.documents.clone())
    }

    /// Apply a mutation to a collection under its lock, persist the result,
    /// then push fresh snapshots to subscribers. The file and the
    /// subscribers are only touched when the mutation succeeds, so a failed
    /// mutation leaves no trace.
    pub(crate) fn mutate<R>(
        &self,
        collection: &str,
        mutation: impl FnOnce(&mut Vec<Value>) -> Result<R>,
    ) -> Result<R> {
        let mut collections = self.lock_collections();
        let state = self.loaded_state(&mut collections, collection)?;

        // Stage the mutation on a working copy: memory, file and
        // subscribers all see either the whole mutation or none of it.
        let mut working = state.documents.clone();
        let result = mutation(&mut working)?;
        self.persist(collection, &working)?;
        state.documents = working;
        Self::notify(state);
        Ok(result)
    }

    /// Register a live query. The current matching snapshot is delivered
    /// immediately; a fresh one follows every mutation of the collection.
    pub(crate) fn subscribe(
        &self,
        collection: &str,
        user_id: Option<&str>,
    ) -> Result<Receiver<Vec<Value>>> {
        let mut collections = self.lock_collections();
        let state = self.loaded_state(&mut collections, collection)?;

        let (sender, receiver) = channel();
        let snapshot = Self::matching(&state.documents, user_id);
        // The receiver is still in hand, so this send cannot fail.
        let _ = sender.send(snapshot);
        state.subscribers.push(SubscriberEntry {
            user_id: user_id.map(str::to_string),
            sender,
        });
        debug!(
            "Subscribed to {} ({} subscribers)",
            collection,
            state.subscribers.len()
        );
        Ok(receiver)
    }

    fn lock_collections(&self) -> std::sync::MutexGuard<'_, HashMap<String, CollectionState>> {
        // A poisoned lock means a panic mid-mutation; the in-memory state
        // is still the last persisted one, so carry on.
        self.inner
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn loaded_state<'a>(
        &self,
        collections: &'a mut HashMap<String, CollectionState>,
        collection: &str,
    ) -> Result<&'a mut CollectionState> {
        let state = collections.entry(collection.to_string()).or_default();
        if !state.loaded {
            state.documents = self.load(collection)?;
            state.loaded = true;
        }
        Ok(state)
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.inner.data_dir.join(format!("{}.json", collection))
    }

    fn load(&self, collection: &str) -> Result<Vec<Value>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read collection file {:?}", path))?;
        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Collection file {:?} is not valid JSON", path))?;
        match value {
            Value::Array(documents) => Ok(documents),
            _ => Err(anyhow!("Collection file {:?} is not a JSON array", path)),
        }
    }

    fn persist(&self, collection: &str, documents: &[Value]) -> Result<()> {
        let path = self.collection_path(collection);
        let tmp_path = self.inner.data_dir.join(format!("{}.json.tmp", collection));
        let contents = serde_json::to_string_pretty(documents)?;
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace {:?}", path))?;
        Ok(())
    }

    /// Push the post-mutation snapshot to every live subscriber, dropping
    /// the ones whose receiving end has gone away.
    fn notify(state: &mut CollectionState) {
        let documents = &state.documents;
        state.subscribers.retain(|subscriber| {
            let snapshot = Self::matching(documents, subscriber.user_id.as_deref());
            subscriber.sender.send(snapshot).is_ok()
        });
    }

    fn matching(documents: &[Value], user_id: Option<&str>) -> Vec<Value> {
        match user_id {
            None => documents.to_vec(),
            Some(user_id) => documents
                .iter()
                .filter(|doc| doc.get("userId").and_then(Value::as_str) == Some(user_id))
                .cloned()
                .collect(),
        }
    }
}

impl Connection for JsonConnection {
    type TransactionRepository = super::TransactionRepository;
    type ChallengeRepository = super::ChallengeRepository;
    type UserRepository = super::UserRepository;
    type OnboardingRepository = super::OnboardingRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        super::TransactionRepository::new(self.clone())
    }

    fn create_challenge_repository(&self) -> Self::ChallengeRepository {
        super::ChallengeRepository::new(self.clone())
    }

    fn create_user_repository(&self) -> Self::UserRepository {
        super::UserRepository::new(self.clone())
    }

    fn create_onboarding_repository(&self) -> Self::OnboardingRepository {
        super::OnboardingRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collections_persist_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        {
            let connection = JsonConnection::new(dir.path()).unwrap();
            connection
                .mutate("things", |docs| {
                    docs.push(json!({"id": "a", "userId": "u1"}));
                    Ok(())
                })
                .unwrap();
        }

        let reopened = JsonConnection::new(dir.path()).unwrap();
        let docs = reopened.documents("things").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], "a");
    }

    #[test]
    fn failed_mutations_leave_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let connection = JsonConnection::new(dir.path()).unwrap();

        let result: Result<()> = connection.mutate("things", |docs| {
            docs.push(json!({"id": "a"}));
            Err(anyhow!("boom"))
        });
        assert!(result.is_err());
        assert!(connection.documents("things").unwrap().is_empty());
        assert!(!dir.path().join("things.json").exists());
    }

    #[test]
    fn subscribers_get_initial_and_post_mutation_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let connection = JsonConnection::new(dir.path()).unwrap();

        let receiver = connection.subscribe("things", Some("u1")).unwrap();
        assert_eq!(receiver.recv().unwrap().len(), 0);

        connection
            .mutate("things", |docs| {
                docs.push(json!({"id": "a", "userId": "u1"}));
                docs.push(json!({"id": "b", "userId": "u2"}));
                Ok(())
            })
            .unwrap();

        let snapshot = receiver.recv().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0]["id"], "a");
    }

    #[test]
    fn dropped_subscribers_are_cleaned_up_on_the_next_push() {
        let dir = tempfile::tempdir().unwrap();
        let connection = JsonConnection::new(dir.path()).unwrap();

        let receiver = connection.subscribe("things", None).unwrap();
        drop(receiver);

        connection
            .mutate("things", |docs| {
                docs.push(json!({"id": "a"}));
                Ok(())
            })
            .unwrap();

        let collections = connection.lock_collections();
        assert!(collections.get("things").unwrap().subscribers.is_empty());
    }
}
