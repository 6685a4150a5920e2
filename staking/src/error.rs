//! Service error types

use thiserror::Error;

/// Failure reported by a collaborator (storage, DEX, registry)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Request cancelled")]
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Timed out after {0} seconds waiting for a snapshot")]
    TimedOut(u64),

    #[error("Service throttled while the request was pending")]
    Throttled,

    #[error("Acquisition failed: {0}")]
    Acquisition(#[from] ProviderError),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<codec::Error> for ServiceError {
    fn from(err: codec::Error) -> Self {
        ServiceError::Decoding(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
