use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

/// Trigger telling sibling views that upstream data changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidated;

#[derive(Clone)]
pub struct InvalidationBus {
    tx: broadcast::Sender<Invalidated>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns how many listeners were signalled. Zero listeners is fine.
    pub fn publish(&self) -> usize {
        let delivered = self.tx.send(Invalidated).unwrap_or(0);
        debug!(listeners = delivered, "published invalidation");
        delivered
    }

    pub fn subscribe(&self) -> InvalidationListener {
        InvalidationListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InvalidationListener {
    rx: broadcast::Receiver<Invalidated>,
}

impl InvalidationListener {
    /// Waits for the next trigger. A burst of queued triggers (including a
    /// lagged receiver) collapses into one. Returns `None` once every bus
    /// handle is dropped.
    pub async fn recv(&mut self) -> Option<Invalidated> {
        match self.rx.recv().await {
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "invalidation listener lagged");
            }
            Err(RecvError::Closed) => return None,
        }
        self.drain();
        Some(Invalidated)
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/invalidation_tests.rs"]
mod tests;
