//! Venue class - observation stations vs. forecast points

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Kind of venue tracked by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueClass {
    /// Physical monitoring station delivering observations
    Observation,
    /// Forecast grid point
    Forecast,
}

impl VenueClass {
    /// The provider's `id_venue_type` for this class
    #[must_use]
    pub const fn type_id(&self) -> u8 {
        match self {
            Self::Observation => 3,
            Self::Forecast => 2,
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Forecast => "forecast",
        }
    }
}

impl fmt::Display for VenueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for VenueClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observation" | "station" | "3" => Ok(Self::Observation),
            "forecast" | "2" => Ok(Self::Forecast),
            _ => Err(DomainError::ValidationError(format!(
                "Invalid venue class: {s}. Use 'observation' or 'forecast'"
            ))),
        }
    }
}
