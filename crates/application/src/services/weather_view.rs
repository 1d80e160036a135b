//! Read-side view over the published refresh state
//!
//! This is the surface a presentation layer consumes: current values,
//! current condition, daily and hourly forecasts, station attributes and
//! units. Everything answers `None` until the first successful refresh.

use std::fmt;

use chrono::{DateTime, Utc};
use domain::{ForecastEntry, WeatherCondition};
use serde::Serialize;
use tokio::sync::watch;

use crate::services::{ForecastProjector, RefreshState};

/// Current conditions at the observation station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<f64>,
    /// From the first 3-hour forecast bucket
    pub condition: Option<WeatherCondition>,
}

/// Auxiliary attributes describing where the data comes from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAttributes {
    /// Configured display name
    pub name: String,
    pub station_id: String,
    pub station_name: String,
    /// Station elevation in meters
    pub altitude: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Units of every reported value; the provider's units pass through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherUnits {
    pub temperature: &'static str,
    pub precipitation: &'static str,
    pub pressure: &'static str,
    pub wind_speed: &'static str,
}

/// Units of the Meteo Euregio data
pub const UNITS: WeatherUnits = WeatherUnits {
    temperature: "°C",
    precipitation: "mm",
    pressure: "hPa",
    wind_speed: "km/h",
};

/// Consumer view of the latest refresh state
pub struct WeatherView {
    name: String,
    projector: ForecastProjector,
    state: watch::Receiver<RefreshState>,
}

impl fmt::Debug for WeatherView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherView")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl WeatherView {
    pub fn new(
        name: impl Into<String>,
        projector: ForecastProjector,
        state: watch::Receiver<RefreshState>,
    ) -> Self {
        Self {
            name: name.into(),
            projector,
            state,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest published state
    pub fn state(&self) -> RefreshState {
        self.state.borrow().clone()
    }

    /// Whether a successful refresh has been published
    pub fn is_available(&self) -> bool {
        self.state.borrow().result.is_some()
    }

    /// Wait until the next state is published
    ///
    /// Returns `false` once the coordinator is gone.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    pub fn current(&self) -> Option<CurrentConditions> {
        self.current_at(Utc::now())
    }

    /// Current conditions, with the day/night rewrite evaluated at `now`
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<CurrentConditions> {
        let state = self.state.borrow();
        let result = state.result.as_ref()?;
        let observation = &result.observation;

        Some(CurrentConditions {
            temperature: observation.temperature,
            precipitation: observation.precipitation,
            pressure: observation.pressure,
            humidity: observation.humidity,
            wind_speed: observation.wind_speed,
            wind_bearing: observation.wind_bearing,
            condition: self.projector.current_condition(&result.forecast, now),
        })
    }

    pub fn daily_forecast(&self) -> Option<Vec<ForecastEntry>> {
        let state = self.state.borrow();
        let result = state.result.as_ref()?;
        Some(self.projector.daily(&result.forecast))
    }

    pub fn hourly_forecast(&self) -> Option<Vec<ForecastEntry>> {
        self.hourly_forecast_at(Utc::now())
    }

    /// Hourly forecast starting at `now`
    pub fn hourly_forecast_at(&self, now: DateTime<Utc>) -> Option<Vec<ForecastEntry>> {
        let state = self.state.borrow();
        let result = state.result.as_ref()?;
        Some(self.projector.hourly(&result.forecast, now))
    }

    /// Station attributes, available once the station has been resolved
    pub fn attributes(&self) -> Option<StationAttributes> {
        let state = self.state.borrow();
        let venue = state.observation_venue.as_ref()?;
        Some(StationAttributes {
            name: self.name.clone(),
            station_id: venue.id().to_string(),
            station_name: venue.name().to_string(),
            altitude: venue.elevation(),
            latitude: venue.latitude(),
            longitude: venue.longitude(),
        })
    }

    #[must_use]
    pub const fn units(&self) -> WeatherUnits {
        UNITS
    }
}
