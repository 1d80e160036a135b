//! Normalized forecast entry
//!
//! One point of a daily or hourly forecast after projection from the
//! provider's time buckets. Units are passed through unchanged from the
//! provider: °C, mm, %, km/h, degrees, m and minutes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::WeatherCondition;

/// A single forecast point. Every value except `time` is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Start of the period this entry describes
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<WeatherCondition>,
    /// Temperature (daily: maximum) in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Daily minimum temperature in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_low: Option<f64>,
    /// Precipitation in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Precipitation probability in %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<f64>,
    /// Wind speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Wind gust speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gust_speed: Option<f64>,
    /// Wind bearing in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_bearing: Option<f64>,
    /// Fresh snow in cm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fresh_snow: Option<f64>,
    /// Snow line in m
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_level: Option<f64>,
    /// Freezing level in m
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freezing_level: Option<f64>,
    /// Sunshine duration in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunshine_duration: Option<f64>,
}

impl ForecastEntry {
    /// Create an entry with only the time set
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// Short human readable line, e.g. for CLI output
    #[must_use]
    pub fn summary(&self) -> String {
        let condition = self
            .condition
            .map_or_else(|| "?".to_string(), |c| format!("{} {c}", c.emoji()));
        let temperature = match (self.temperature, self.temperature_low) {
            (Some(high), Some(low)) => format!("{high:.0}°C / {low:.0}°C"),
            (Some(t), None) => format!("{t:.0}°C"),
            (None, Some(low)) => format!("-- / {low:.0}°C"),
            (None, None) => "--".to_string(),
        };
        let precipitation = self
            .precipitation
            .map_or_else(String::new, |p| format!(", {p:.1} mm"));
        format!("{condition}, {temperature}{precipitation}")
    }
}
