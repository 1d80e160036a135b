//! Venue entity
//!
//! A venue is either a measuring station (observation class) or a forecast
//! grid point (forecast class) published by the provider's venue directory.

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, VenueId};

/// A provider venue, immutable once resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    id: VenueId,
    name: String,
    /// Elevation above sea level in meters
    elevation: i32,
    location: GeoLocation,
}

impl Venue {
    /// Create a new venue
    #[must_use]
    pub fn new(
        id: impl Into<VenueId>,
        name: impl Into<String>,
        elevation: i32,
        location: GeoLocation,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elevation,
            location,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &VenueId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elevation in meters
    #[must_use]
    pub const fn elevation(&self) -> i32 {
        self.elevation
    }

    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        self.location
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.longitude()
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} m ({})",
            self.name, self.id, self.elevation, self.location
        )
    }
}
