//! Live query subscriptions.
//!
//! A subscription is a sequence of immutable snapshots: the full current
//! result set at subscribe time, then the full result set again after every
//! mutation of the underlying collection. No diffs are delivered — the
//! consumer re-derives whatever it renders from each snapshot (the
//! recompute-from-snapshot policy of the aggregation layer).

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use serde_json::Value;

/// A handle to a live collection query.
///
/// Raw documents cross the channel; decoding (and the silent-skip of
/// malformed records) happens on this side, at the same store boundary as
/// ordinary reads.
pub struct Subscription<T> {
    receiver: Receiver<Vec<Value>>,
    decode: fn(&Value) -> Option<T>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(receiver: Receiver<Vec<Value>>, decode: fn(&Value) -> Option<T>) -> Self {
        Subscription { receiver, decode }
    }

    /// Block until the next snapshot. Returns `None` once the store side
    /// has gone away.
    pub fn recv(&self) -> Option<Vec<T>> {
        self.receiver.recv().ok().map(|docs| self.decode_all(&docs))
    }

    /// Non-blocking variant; `None` when no snapshot is pending or the
    /// store side has gone away.
    pub fn try_recv(&self) -> Option<Vec<T>> {
        match self.receiver.try_recv() {
            Ok(docs) => Some(self.decode_all(&docs)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Bounded-wait variant used by callers that poll with a deadline.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(docs) => Some(self.decode_all(&docs)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn decode_all(&self, documents: &[Value]) -> Vec<T> {
        documents.iter().filter_map(self.decode).collect()
    }
}
