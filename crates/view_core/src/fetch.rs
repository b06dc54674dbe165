use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    error::FetchError,
    protocol::{EntityBatch, Resource},
};
use storage::{FixtureStore, StorageError};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Source of entity collections. Must tolerate repeated and concurrent calls.
#[async_trait]
pub trait FetchProvider: Send + Sync {
    async fn fetch_entities(&self, resource: Resource) -> Result<EntityBatch, FetchError>;
}

#[async_trait]
impl FetchProvider for FixtureStore {
    async fn fetch_entities(&self, resource: Resource) -> Result<EntityBatch, FetchError> {
        self.load(resource).await.map_err(|error| match error {
            StorageError::NotFound(_) => FetchError::NotFound {
                resource: resource.to_string(),
            },
            StorageError::Malformed { source, .. } => FetchError::Malformed {
                resource: resource.to_string(),
                message: source.to_string(),
            },
            other => FetchError::unavailable(resource.load_key(), other.to_string()),
        })
    }
}

#[derive(Debug, Clone)]
enum Response {
    Batch(EntityBatch),
    Fail(FetchError),
    Hang,
}

#[derive(Debug, Clone)]
struct Scripted {
    response: Response,
    delay: Option<Duration>,
}

/// Provider backed by in-process data with scriptable failures, delays and
/// hangs.
#[derive(Default)]
pub struct InMemoryFetchProvider {
    scripted: RwLock<HashMap<Resource, Scripted>>,
    calls: Mutex<HashMap<Resource, usize>>,
}

impl InMemoryFetchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(mut self, batch: EntityBatch) -> Self {
        if let Some(resource) = batch.resource() {
            self.scripted.get_mut().insert(
                resource,
                Scripted {
                    response: Response::Batch(batch),
                    delay: None,
                },
            );
        }
        self
    }

    pub fn with_failure(mut self, resource: Resource, error: FetchError) -> Self {
        self.scripted.get_mut().insert(
            resource,
            Scripted {
                response: Response::Fail(error),
                delay: None,
            },
        );
        self
    }

    /// The fetch for `resource` never settles.
    pub fn with_hang(mut self, resource: Resource) -> Self {
        self.scripted.get_mut().insert(
            resource,
            Scripted {
                response: Response::Hang,
                delay: None,
            },
        );
        self
    }

    pub fn with_delay(mut self, resource: Resource, delay: Duration) -> Self {
        if let Some(scripted) = self.scripted.get_mut().get_mut(&resource) {
            scripted.delay = Some(delay);
        }
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Replaces the data served for the batch's resource.
    pub async fn replace(&self, batch: EntityBatch) {
        let Some(resource) = batch.resource() else {
            return;
        };
        self.scripted.write().await.insert(
            resource,
            Scripted {
                response: Response::Batch(batch),
                delay: None,
            },
        );
    }

    pub async fn calls(&self, resource: Resource) -> usize {
        self.calls
            .lock()
            .await
            .get(&resource)
            .copied()
            .unwrap_or_default()
    }
}

#[async_trait]
impl FetchProvider for InMemoryFetchProvider {
    async fn fetch_entities(&self, resource: Resource) -> Result<EntityBatch, FetchError> {
        *self.calls.lock().await.entry(resource).or_default() += 1;

        let scripted = self.scripted.read().await.get(&resource).cloned();
        let Some(scripted) = scripted else {
            debug!(%resource, "no data scripted");
            return Err(FetchError::NotFound {
                resource: resource.to_string(),
            });
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        match scripted.response {
            Response::Batch(batch) => Ok(batch),
            Response::Fail(error) => Err(error),
            Response::Hang => std::future::pending().await,
        }
    }
}
