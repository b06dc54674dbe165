use std::{
    collections::{BTreeSet, HashMap},
    future::Future,
    sync::Arc,
    time::Duration,
};

use futures::{future::BoxFuture, stream::FuturesUnordered, FutureExt as _, StreamExt as _};
use shared::{error::FetchError, protocol::Severity};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    notify::NotificationSink,
    pending_set::{LoadKey, PendingSet, PendingWatch},
};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One named fetch taking part in a fan-in cycle.
pub struct LoadOperation<'a, T> {
    key: LoadKey,
    task: BoxFuture<'a, Result<T, FetchError>>,
}

impl<'a, T> LoadOperation<'a, T> {
    pub fn new<F>(key: impl Into<LoadKey>, task: F) -> Self
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'a,
    {
        Self {
            key: key.into(),
            task: task.boxed(),
        }
    }

    pub fn key(&self) -> &LoadKey {
        &self.key
    }
}

/// Outcome of one cycle. Failed keys hold `T::default()`.
#[derive(Debug)]
pub struct FanInReport<T> {
    pub cycle: u64,
    pub ready: bool,
    results: HashMap<LoadKey, T>,
    failures: Vec<(LoadKey, FetchError)>,
}

impl<T: Default> FanInReport<T> {
    fn new(cycle: u64) -> Self {
        Self {
            cycle,
            ready: false,
            results: HashMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn get(&self, key: &LoadKey) -> Option<&T> {
        self.results.get(key)
    }

    /// Moves the result for `key` out, or `T::default()` if there is none.
    pub fn take(&mut self, key: &LoadKey) -> T {
        self.results.remove(key).unwrap_or_default()
    }

    pub fn failures(&self) -> &[(LoadKey, FetchError)] {
        &self.failures
    }

    pub fn failed(&self, key: &LoadKey) -> bool {
        self.failures.iter().any(|(failed, _)| failed == key)
    }

    pub fn settled(&self) -> usize {
        self.results.len()
    }
}

/// Clears the keys of an interrupted cycle so a dropped view never leaves
/// stale entries behind.
struct CycleGuard<'a> {
    pending: &'a PendingSet,
    outstanding: BTreeSet<LoadKey>,
}

impl<'a> CycleGuard<'a> {
    fn new(pending: &'a PendingSet) -> Self {
        Self {
            pending,
            outstanding: BTreeSet::new(),
        }
    }

    fn track(&mut self, key: LoadKey) {
        self.outstanding.insert(key);
    }

    fn settle(&mut self, key: &LoadKey) {
        self.outstanding.remove(key);
        self.pending.remove(key);
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.outstanding.is_empty() {
            return;
        }
        debug!(count = self.outstanding.len(), "clearing keys of cancelled cycle");
        for key in &self.outstanding {
            self.pending.remove(key);
        }
    }
}

/// Runs named fetches concurrently and reports once all have settled.
pub struct FanIn {
    pending: PendingSet,
    notifier: Arc<dyn NotificationSink>,
    timeout: Option<Duration>,
    cycle: u64,
    ready: watch::Sender<u64>,
}

impl FanIn {
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        let (ready, _) = watch::channel(0);
        Self {
            pending: PendingSet::new(),
            notifier,
            timeout: Some(DEFAULT_FETCH_TIMEOUT),
            cycle: 0,
            ready,
        }
    }

    /// `None` disables the per-task timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    pub fn loading(&self) -> PendingWatch {
        self.pending.watch()
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Latest cycle that reached ready; `0` before the first one.
    pub fn subscribe_ready(&self) -> watch::Receiver<u64> {
        self.ready.subscribe()
    }

    pub fn dispose(&mut self) {
        self.pending.dispose();
    }

    /// Registers every key, drives all tasks to completion and returns the
    /// collected results. A failing or timed-out task yields `T::default()`,
    /// emits one error notification and leaves its siblings untouched.
    pub async fn run_all<T>(&mut self, operations: Vec<LoadOperation<'_, T>>) -> FanInReport<T>
    where
        T: Default + Send,
    {
        self.cycle += 1;
        let cycle = self.cycle;
        let mut report = FanInReport::new(cycle);
        if self.pending.is_disposed() {
            debug!(cycle, "fan-in disposed; cycle skipped");
            return report;
        }

        // Keys already pending belong to another operation: this cycle
        // neither runs nor clears them, but waits for them to clear.
        let mut required = BTreeSet::new();
        let mut accepted = Vec::with_capacity(operations.len());
        let mut guard = CycleGuard::new(&self.pending);
        for operation in operations {
            let key = operation.key().clone();
            if !required.insert(key.clone()) {
                warn!(%key, cycle, "duplicate load key skipped");
            } else if self.pending.add(key.clone()) {
                guard.track(key);
                accepted.push(operation);
            } else {
                warn!(%key, cycle, "load key owned by another operation; skipped");
            }
        }
        debug!(
            cycle,
            keys = required.len(),
            owned = accepted.len(),
            "fan-in cycle started"
        );

        let accepted_count = accepted.len();
        let timeout = self.timeout;
        let mut in_flight: FuturesUnordered<_> = accepted
            .into_iter()
            .map(|LoadOperation { key, task }| async move {
                let result = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, task).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::TimedOut {
                            resource: key.to_string(),
                            after: limit,
                        }),
                    },
                    None => task.await,
                };
                (key, result)
            })
            .collect();

        while let Some((key, result)) = in_flight.next().await {
            match result {
                Ok(value) => {
                    debug!(%key, cycle, "load settled");
                    report.results.insert(key.clone(), value);
                }
                Err(error) => {
                    warn!(%key, cycle, %error, "load failed");
                    self.notifier
                        .notify(&format!("Could not load {key}: {error}"), Severity::Error);
                    report.results.insert(key.clone(), T::default());
                    report.failures.push((key.clone(), error));
                }
            }
            guard.settle(&key);
        }
        drop(guard);

        report.ready = required.iter().all(|key| !self.pending.contains(key))
            && report.results.len() == accepted_count;
        if report.ready {
            self.ready.send_replace(cycle);
            info!(
                cycle,
                loaded = report.settled(),
                failed = report.failures.len(),
                "fan-in ready"
            );
        }
        report
    }
}

#[cfg(test)]
#[path = "tests/fan_in_tests.rs"]
mod tests;
