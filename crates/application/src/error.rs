//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No suitable venue could be resolved for the configured location
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider data could not be fetched or decoded
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if the next refresh cycle may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::Configuration(_) | ApplicationError::DataUnavailable(_)
        )
    }
}
