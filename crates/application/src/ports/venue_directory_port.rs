//! Venue directory port

use async_trait::async_trait;
use domain::{Venue, VenueClass};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for listing the provider's venues
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VenueDirectoryPort: Send + Sync {
    /// List every venue of a class, in provider order
    ///
    /// An empty list is a valid answer.
    async fn list_venues(&self, class: VenueClass) -> Result<Vec<Venue>, ApplicationError>;
}
