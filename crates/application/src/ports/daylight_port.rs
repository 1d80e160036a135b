//! Day/night oracle port

use chrono::{DateTime, Utc};
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

/// Answers whether the sun is up at a place and time
#[cfg_attr(test, automock)]
pub trait DaylightPort: Send + Sync {
    /// `true` between sunrise and sunset at `location`
    fn is_daylight(&self, instant: DateTime<Utc>, location: &GeoLocation) -> bool;
}
