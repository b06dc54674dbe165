use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{EntityBatch, Resource};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("data directory '{}' does not exist", .0.display())]
    MissingRoot(PathBuf),
    #[error("fixture file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed fixture '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory of JSON fixtures, one array file per resource.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StorageError::MissingRoot(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_for(&self, resource: Resource) -> PathBuf {
        self.root.join(format!("{}.json", resource.load_key()))
    }

    pub async fn load(&self, resource: Resource) -> Result<EntityBatch, StorageError> {
        let batch = match resource {
            Resource::Offices => EntityBatch::Offices(self.load_items(resource).await?),
            Resource::Invoices => EntityBatch::Invoices(self.load_items(resource).await?),
            Resource::ChartOfAccounts => {
                EntityBatch::ChartOfAccounts(self.load_items(resource).await?)
            }
            Resource::Properties => EntityBatch::Properties(self.load_items(resource).await?),
        };
        debug!(%resource, count = batch.len(), "loaded fixture");
        Ok(batch)
    }

    pub async fn load_items<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> Result<Vec<T>, StorageError> {
        let path = self.file_for(resource);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path));
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_slice(&raw).map_err(|source| StorageError::Malformed { path, source })
    }

    /// Writes `items` as the fixture for `resource`, creating the root if needed.
    pub async fn save<T: Serialize>(
        &self,
        resource: Resource,
        items: &[T],
    ) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })?;

        let path = self.file_for(resource);
        let raw = serde_json::to_vec_pretty(items).map_err(|source| StorageError::Malformed {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, raw)
            .await
            .map_err(|source| StorageError::Io { path, source })?;
        debug!(%resource, count = items.len(), "saved fixture");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
