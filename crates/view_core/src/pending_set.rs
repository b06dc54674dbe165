use std::{collections::BTreeSet, sync::Arc};

use futures::Stream;
use shared::protocol::Resource;
use tokio::sync::watch;
use tokio_stream::{wrappers::WatchStream, StreamExt as _};
use tracing::debug;

/// Identifier of one outstanding fetch. Only set membership matters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadKey(String);

impl LoadKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LoadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoadKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LoadKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Resource> for LoadKey {
    fn from(value: Resource) -> Self {
        Self(value.load_key().to_string())
    }
}

/// Published snapshots are never mutated; every change swaps in a new set.
pub type PendingSnapshot = Arc<BTreeSet<LoadKey>>;

/// Set of outstanding load keys, observable as a stream of snapshots.
pub struct PendingSet {
    tx: Option<watch::Sender<PendingSnapshot>>,
    rx: watch::Receiver<PendingSnapshot>,
}

impl PendingSet {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(PendingSnapshot::default());
        Self { tx: Some(tx), rx }
    }

    /// Inserts `key`. Returns false (and emits nothing) if it was already
    /// pending or the set is disposed.
    pub fn add(&self, key: impl Into<LoadKey>) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        let key = key.into();
        let added = tx.send_if_modified(|snapshot| {
            if snapshot.contains(&key) {
                return false;
            }
            let mut next = BTreeSet::clone(snapshot);
            next.insert(key.clone());
            *snapshot = Arc::new(next);
            true
        });
        if !added {
            debug!(%key, "load key already pending");
        }
        added
    }

    /// Removes `key`. Removing an absent key is a no-op without emission.
    pub fn remove(&self, key: &LoadKey) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        tx.send_if_modified(|snapshot| {
            if !snapshot.contains(key) {
                return false;
            }
            let mut next = BTreeSet::clone(snapshot);
            next.remove(key);
            *snapshot = Arc::new(next);
            true
        })
    }

    pub fn contains(&self, key: &LoadKey) -> bool {
        self.rx.borrow().contains(key)
    }

    pub fn len(&self) -> usize {
        self.rx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.borrow().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        !self.is_empty()
    }

    pub fn snapshot(&self) -> PendingSnapshot {
        self.rx.borrow().clone()
    }

    /// Watcher that has already seen the current snapshot.
    pub fn watch(&self) -> PendingWatch {
        let mut rx = self.rx.clone();
        rx.mark_unchanged();
        PendingWatch { rx }
    }

    pub fn is_disposed(&self) -> bool {
        self.tx.is_none()
    }

    /// Ends the snapshot stream. Later mutations are ignored.
    pub fn dispose(&mut self) {
        if self.tx.take().is_some() {
            debug!("pending set disposed");
        }
    }
}

impl Default for PendingSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a [`PendingSet`].
#[derive(Clone)]
pub struct PendingWatch {
    rx: watch::Receiver<PendingSnapshot>,
}

impl PendingWatch {
    pub fn snapshot(&self) -> PendingSnapshot {
        self.rx.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        !self.rx.borrow().is_empty()
    }

    /// Waits for the next snapshot. Returns false once the set is disposed.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Waits until nothing is pending. Returns false if the set is disposed
    /// while keys are still outstanding.
    pub async fn wait_idle(&mut self) -> bool {
        self.rx.wait_for(|snapshot| snapshot.is_empty()).await.is_ok()
    }

    /// Derived loading signal: the current value first, then one item per
    /// snapshot. Ends when the set is disposed.
    pub fn loading_stream(&self) -> impl Stream<Item = bool> + Send + 'static {
        WatchStream::new(self.rx.clone()).map(|snapshot| !snapshot.is_empty())
    }
}

#[cfg(test)]
#[path = "tests/pending_set_tests.rs"]
mod tests;
