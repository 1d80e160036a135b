//! Refresh coordination
//!
//! One refresh cycle resolves the observation and forecast venues (once per
//! coordinator lifetime), fetches the latest observation and forecast, and
//! publishes the combined result on a `watch` channel. A failed cycle leaves
//! the previously published result in place and only records the error.
//!
//! Cycles never overlap: the venue cache lock is held for the whole cycle.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{GeoLocation, Venue, VenueClass, VenueId};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{Observation, RawForecast, VenueDirectoryPort, WeatherDataPort},
    services::VenueLocator,
};

/// Message raised when either venue class cannot be resolved
pub const NO_STATIONS_MESSAGE: &str = "Could not find suitable weather stations";

/// Data fetched by one successful refresh cycle, replaced wholesale
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshResult {
    pub observation: Observation,
    pub forecast: RawForecast,
    pub fetched_at: DateTime<Utc>,
}

/// Snapshot published after every refresh attempt
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    /// Latest successful result; kept when a later cycle fails
    pub result: Option<Arc<RefreshResult>>,
    /// Resolved observation station
    pub observation_venue: Option<Venue>,
    /// Error of the latest attempt, cleared on success
    pub last_error: Option<String>,
    /// Incremented on every publication
    pub version: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
}

impl RefreshState {
    /// Data is present but the latest attempt failed
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.result.is_some() && self.last_error.is_some()
    }
}

/// Venues resolved so far; each slot is filled at most once
#[derive(Debug, Default)]
struct VenueCache {
    observation_venue: Option<Venue>,
    forecast_venue_id: Option<VenueId>,
}

/// Orchestrates refresh cycles and publishes their outcome
pub struct RefreshCoordinator {
    locator: VenueLocator,
    weather: Arc<dyn WeatherDataPort>,
    location: GeoLocation,
    venues: Mutex<VenueCache>,
    state: watch::Sender<RefreshState>,
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("location", &self.location)
            .field("version", &self.state.borrow().version)
            .finish_non_exhaustive()
    }
}

impl RefreshCoordinator {
    /// Create a coordinator for a fixed location
    pub fn new(
        directory: Arc<dyn VenueDirectoryPort>,
        weather: Arc<dyn WeatherDataPort>,
        location: GeoLocation,
    ) -> Self {
        let (state, _) = watch::channel(RefreshState::default());
        Self {
            locator: VenueLocator::new(directory),
            weather,
            location,
            venues: Mutex::new(VenueCache::default()),
            state,
        }
    }

    #[must_use]
    pub const fn location(&self) -> &GeoLocation {
        &self.location
    }

    /// Receive every published state
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    /// Current published state
    pub fn snapshot(&self) -> RefreshState {
        self.state.borrow().clone()
    }

    /// Run one refresh cycle, waiting for a running one to finish first
    ///
    /// The composition root awaits this once before handing data to
    /// consumers; an error there aborts startup.
    #[instrument(skip(self), fields(location = %self.location))]
    pub async fn refresh(&self) -> Result<Arc<RefreshResult>, ApplicationError> {
        let mut venues = self.venues.lock().await;
        self.run_and_publish(&mut venues).await
    }

    /// Run one refresh cycle unless another one is in progress
    ///
    /// Returns `Ok(None)` when the cycle was skipped.
    #[instrument(skip(self), fields(location = %self.location))]
    pub async fn try_refresh(&self) -> Result<Option<Arc<RefreshResult>>, ApplicationError> {
        let Ok(mut venues) = self.venues.try_lock() else {
            debug!("Refresh already in progress, skipping");
            return Ok(None);
        };
        self.run_and_publish(&mut venues).await.map(Some)
    }

    async fn run_and_publish(
        &self,
        venues: &mut VenueCache,
    ) -> Result<Arc<RefreshResult>, ApplicationError> {
        let attempt = Utc::now();
        match self.run_cycle(venues).await {
            Ok(result) => {
                let result = Arc::new(result);
                let observation_venue = venues.observation_venue.clone();
                self.state.send_modify(|state| {
                    state.result = Some(Arc::clone(&result));
                    state.observation_venue = observation_venue;
                    state.last_error = None;
                    state.last_success = Some(attempt);
                    state.last_attempt = Some(attempt);
                    state.version += 1;
                });
                info!(
                    observation_ts = result.observation.timestamp,
                    forecast_start = %result.forecast.start,
                    "Weather data refreshed"
                );
                Ok(result)
            },
            Err(e) => {
                let message = e.to_string();
                self.state.send_modify(|state| {
                    state.last_error = Some(message);
                    state.last_attempt = Some(attempt);
                    state.version += 1;
                });
                warn!(error = %e, "Weather refresh failed, keeping previous data");
                Err(e)
            },
        }
    }

    async fn run_cycle(&self, venues: &mut VenueCache) -> Result<RefreshResult, ApplicationError> {
        if venues.observation_venue.is_none() {
            venues.observation_venue = self
                .locator
                .locate(&self.location, VenueClass::Observation)
                .await?;
        }

        if venues.forecast_venue_id.is_none() {
            venues.forecast_venue_id = self
                .locator
                .locate(&self.location, VenueClass::Forecast)
                .await?
                .map(|venue| venue.id().clone());
        }

        let (Some(station), Some(forecast_id)) =
            (&venues.observation_venue, &venues.forecast_venue_id)
        else {
            return Err(ApplicationError::Configuration(
                NO_STATIONS_MESSAGE.to_string(),
            ));
        };

        debug!(station = %station.id(), forecast = %forecast_id, "Fetching weather data");
        let observation = self.weather.fetch_observation(station.id()).await?;
        let forecast = self.weather.fetch_forecast(forecast_id).await?;

        Ok(RefreshResult {
            observation,
            forecast,
            fetched_at: Utc::now(),
        })
    }
}
