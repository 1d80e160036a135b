//! Nearest-venue resolution
//!
//! Venues are ranked by squared planar distance in degree space,
//! `(Δlat)² + (Δlon)²`. Ties go to the venue listed first by the provider.

use std::{fmt, sync::Arc};

use domain::{GeoLocation, Venue, VenueClass};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::VenueDirectoryPort};

/// Resolves the venue closest to a location
pub struct VenueLocator {
    directory: Arc<dyn VenueDirectoryPort>,
}

impl fmt::Debug for VenueLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueLocator").finish_non_exhaustive()
    }
}

impl VenueLocator {
    /// Create a new locator over a venue directory
    pub fn new(directory: Arc<dyn VenueDirectoryPort>) -> Self {
        Self { directory }
    }

    /// Find the venue of `class` nearest to `location`
    ///
    /// Performs exactly one directory request. Returns `Ok(None)` when the
    /// directory is empty.
    #[instrument(skip(self), fields(location = %location))]
    pub async fn locate(
        &self,
        location: &GeoLocation,
        class: VenueClass,
    ) -> Result<Option<Venue>, ApplicationError> {
        let venues = self.directory.list_venues(class).await?;
        debug!(count = venues.len(), "Venue directory loaded");

        let nearest = nearest_venue(&venues, location).cloned();
        match &nearest {
            Some(venue) => info!(
                venue_id = %venue.id(),
                venue = %venue.name(),
                distance_km = venue.location().distance_km(location),
                "Nearest venue resolved"
            ),
            None => info!("Venue directory is empty"),
        }
        Ok(nearest)
    }
}

/// Pick the venue with minimal squared distance; first one wins on ties
pub fn nearest_venue<'a>(venues: &'a [Venue], location: &GeoLocation) -> Option<&'a Venue> {
    let mut best: Option<(&Venue, f64)> = None;
    for venue in venues {
        let distance = venue.location().squared_distance(location);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((venue, distance));
        }
    }
    best.map(|(venue, _)| venue)
}
