//! Location the client reports weather for

use chrono_tz::Tz;
use domain::GeoLocation;
use serde::{Deserialize, Serialize};

/// Display name and coordinates of the monitored location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Display name (default: "Home")
    #[serde(default = "default_name")]
    pub name: String,
    /// Latitude (-90.0 to 90.0)
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude (-180.0 to 180.0)
    #[serde(default)]
    pub longitude: Option<f64>,
    /// IANA zone for provider times without an offset (default: "Europe/Rome")
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_name() -> String {
    "Home".to_string()
}

fn default_timezone() -> String {
    "Europe/Rome".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            latitude: None,
            longitude: None,
            timezone: default_timezone(),
        }
    }
}

impl LocationConfig {
    /// Convert to a validated `GeoLocation`
    ///
    /// Returns `None` if either coordinate is missing or out of range.
    #[must_use]
    pub fn to_geo_location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.latitude?, self.longitude?).ok()
    }

    /// The configured zone, if it names an IANA time zone
    #[must_use]
    pub fn tz(&self) -> Option<Tz> {
        self.timezone.trim().parse().ok()
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("location.name must not be empty".to_string());
        }
        if self.tz().is_none() {
            return Err(format!(
                "location.timezone '{}' is not a known time zone",
                self.timezone
            ));
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoLocation::new(lat, lon)
                .map(|_| ())
                .map_err(|e| format!("location: {e}")),
            _ => Err("location.latitude and location.longitude are required".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_valid_coordinates() {
        let config = LocationConfig {
            latitude: Some(47.2692),
            longitude: Some(11.4041),
            ..LocationConfig::default()
        };
        let location = config.to_geo_location().unwrap();
        assert!((location.latitude() - 47.2692).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_coordinates_are_rejected() {
        let config = LocationConfig::default();
        assert!(config.to_geo_location().is_none());
        assert!(config.validate().unwrap_err().contains("required"));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let config = LocationConfig {
            latitude: Some(91.0),
            longitude: Some(11.0),
            ..LocationConfig::default()
        };
        assert!(config.to_geo_location().is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let config = LocationConfig {
            name: "  ".to_string(),
            latitude: Some(46.5),
            longitude: Some(11.35),
            ..LocationConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("name"));
    }

    #[test]
    fn timezone_defaults_to_rome() {
        let config = LocationConfig::default();
        assert_eq!(config.timezone, "Europe/Rome");
        assert_eq!(config.tz(), Some(chrono_tz::Europe::Rome));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = LocationConfig {
            latitude: Some(46.5),
            longitude: Some(11.35),
            timezone: "Europe/Atlantis".to_string(),
            ..LocationConfig::default()
        };
        assert!(config.tz().is_none());
        assert!(config.validate().unwrap_err().contains("timezone"));
    }
}
