//! Meteo Euregio adapter - Implements the venue directory and weather data ports

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{
    ForecastBucket, Observation, RawForecast, VenueDirectoryPort, WeatherDataPort,
};
use async_trait::async_trait;
use chrono_tz::Tz;
use domain::{Venue, VenueClass, VenueId};
use integration_meteoeuregio::{
    BucketRecord, ForecastDocument, LatestObservation, MeteoClient, MeteoConfig, MeteoError,
    MeteoEuregioClient, VenueRecord,
};
use tracing::{debug, instrument, warn};

/// Adapter over the Meteo Euregio client
///
/// Transport and payload failures are not distinguished beyond this point;
/// every client error surfaces as `ApplicationError::DataUnavailable`.
/// Forecast starts written without an offset are read in `timezone`.
pub struct MeteoEuregioAdapter {
    client: Arc<dyn MeteoClient>,
    timezone: Tz,
}

impl std::fmt::Debug for MeteoEuregioAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeteoEuregioAdapter")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl MeteoEuregioAdapter {
    /// Wrap an existing client
    pub fn new(client: Arc<dyn MeteoClient>) -> Self {
        Self {
            client,
            timezone: chrono_tz::Europe::Rome,
        }
    }

    /// Read naive forecast starts in `timezone` instead of Europe/Rome
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Create with a reqwest client for the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: MeteoConfig) -> Result<Self, ApplicationError> {
        let client =
            MeteoEuregioClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::new(Arc::new(client)))
    }

    fn map_error(err: MeteoError) -> ApplicationError {
        ApplicationError::DataUnavailable(err.to_string())
    }

    /// Convert directory records, dropping entries with unusable coordinates
    fn map_venues(records: &[VenueRecord]) -> Vec<Venue> {
        records
            .iter()
            .filter_map(|record| match record.to_venue() {
                Ok(venue) => Some(venue),
                Err(e) => {
                    warn!(venue_id = %record.id, error = %e, "Skipping venue");
                    None
                },
            })
            .collect()
    }

    fn map_observation(latest: LatestObservation) -> Observation {
        let record = latest.record;
        Observation {
            timestamp: latest.timestamp,
            temperature: record.temperature,
            precipitation: record.rain_fall,
            pressure: record.pressure,
            humidity: record.relative_humidity,
            wind_speed: record.wind_speed,
            wind_bearing: record.wind_direction,
        }
    }

    fn map_bucket(bucket: BucketRecord) -> ForecastBucket {
        ForecastBucket {
            sky_condition: bucket.sky_condition,
            temperature: bucket.temperature,
            temperature_min: bucket.temperature_minimum,
            temperature_max: bucket.temperature_maximum,
            precipitation: bucket.rain_fall,
            precipitation_probability: bucket.rain_probability,
            wind_speed: bucket.wind_speed,
            wind_gust: bucket.wind_gust,
            wind_bearing: bucket.wind_direction,
            fresh_snow: bucket.fresh_snow,
            snow_level: bucket.snow_level,
            freezing_level: bucket.freezing_level,
            sunshine_duration: bucket.sunshine_duration,
        }
    }

    fn map_forecast(&self, document: ForecastDocument) -> RawForecast {
        RawForecast {
            start: document.start.resolve(&self.timezone),
            three_hourly: document.three_hourly.into_iter().map(Self::map_bucket).collect(),
            daily: document.daily.into_iter().map(Self::map_bucket).collect(),
        }
    }
}

#[async_trait]
impl VenueDirectoryPort for MeteoEuregioAdapter {
    #[instrument(skip(self), fields(class = %class))]
    async fn list_venues(&self, class: VenueClass) -> Result<Vec<Venue>, ApplicationError> {
        let records = self.client.fetch_venues(class).await.map_err(|e| {
            warn!(error = %e, "Venue directory request failed");
            Self::map_error(e)
        })?;

        let venues = Self::map_venues(&records);
        debug!(
            received = records.len(),
            usable = venues.len(),
            "Venue directory mapped"
        );
        Ok(venues)
    }
}

#[async_trait]
impl WeatherDataPort for MeteoEuregioAdapter {
    #[instrument(skip(self), fields(venue_id = %venue_id))]
    async fn fetch_observation(&self, venue_id: &VenueId) -> Result<Observation, ApplicationError> {
        let latest = self
            .client
            .fetch_observation(venue_id.as_str())
            .await
            .map_err(|e| {
                warn!(error = %e, "Observation request failed");
                Self::map_error(e)
            })?;

        debug!(timestamp = latest.timestamp, "Observation received");
        Ok(Self::map_observation(latest))
    }

    #[instrument(skip(self), fields(venue_id = %venue_id))]
    async fn fetch_forecast(&self, venue_id: &VenueId) -> Result<RawForecast, ApplicationError> {
        let document = self
            .client
            .fetch_forecast(venue_id.as_str())
            .await
            .map_err(|e| {
                warn!(error = %e, "Forecast request failed");
                Self::map_error(e)
            })?;

        debug!(
            start = %document.start,
            three_hourly = document.three_hourly.len(),
            daily = document.daily.len(),
            "Forecast received"
        );
        Ok(self.map_forecast(document))
    }
}
