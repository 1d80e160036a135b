//! Domain-level errors

use thiserror::Error;

use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude range
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// A venue record could not be turned into a `Venue`
    #[error("Invalid venue: {0}")]
    InvalidVenue(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
