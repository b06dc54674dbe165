use std::time::Duration;

use thiserror::Error;

/// Failure of a single entity fetch. Never fatal to a view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("{resource} unavailable: {message}")]
    Unavailable { resource: String, message: String },
    #[error("malformed {resource} data: {message}")]
    Malformed { resource: String, message: String },
    #[error("{resource} fetch timed out after {}ms", .after.as_millis())]
    TimedOut { resource: String, after: Duration },
}

impl FetchError {
    pub fn unavailable(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            resource: resource.into(),
            message: message.into(),
        }
    }
}
