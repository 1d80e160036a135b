//! Weather data port
//!
//! Defines the interface for retrieving observations and raw forecasts of a
//! resolved venue, and the provider-neutral shapes they arrive in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{VenueId, WeatherCondition};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Latest measurement of an observation station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Provider timestamp key of the selected record
    pub timestamp: i64,
    /// Air temperature in °C
    pub temperature: Option<f64>,
    /// Precipitation in mm
    pub precipitation: Option<f64>,
    /// Air pressure in hPa
    pub pressure: Option<f64>,
    /// Relative humidity in %
    pub humidity: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Wind bearing in degrees
    pub wind_bearing: Option<f64>,
}

/// One forecast time bucket as delivered by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastBucket {
    /// Sky condition letter `A`..=`Z`
    pub sky_condition: Option<String>,
    pub temperature: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub precipitation: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub fresh_snow: Option<f64>,
    pub snow_level: Option<f64>,
    pub freezing_level: Option<f64>,
    pub sunshine_duration: Option<f64>,
}

impl ForecastBucket {
    /// Normalized condition for the bucket's sky code, if known
    #[must_use]
    pub fn condition(&self) -> Option<WeatherCondition> {
        self.sky_condition
            .as_deref()
            .and_then(WeatherCondition::from_sky_code)
    }
}

/// Forecast as delivered by the provider, buckets in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    /// Start of the first bucket of either series
    pub start: DateTime<Utc>,
    /// 3-hour buckets
    pub three_hourly: Vec<ForecastBucket>,
    /// Daily buckets
    pub daily: Vec<ForecastBucket>,
}

/// Port for fetching weather data of a venue
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherDataPort: Send + Sync {
    /// Fetch the most recent observation of a station
    async fn fetch_observation(&self, venue_id: &VenueId) -> Result<Observation, ApplicationError>;

    /// Fetch the forecast of a forecast venue
    async fn fetch_forecast(&self, venue_id: &VenueId) -> Result<RawForecast, ApplicationError>;
}
