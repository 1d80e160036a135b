//! Forecast projection
//!
//! Turns the provider's time buckets into uniform [`ForecastEntry`] lists:
//!
//! - daily: one entry per daily bucket at `start + i days`
//! - hourly: every 3-hour bucket expands to three hourly entries at
//!   `start + 3i + {0, 1, 2} hours`; entries before `now` are skipped and
//!   the list is capped at `hourly_limit`
//!
//! Sunny hourly entries are rewritten to clear-night when the sun is down.

use std::{fmt, iter, sync::Arc};

use chrono::{DateTime, TimeDelta, Utc};
use domain::{ForecastEntry, GeoLocation, WeatherCondition};

use crate::ports::{DaylightPort, ForecastBucket, RawForecast};

/// Hourly entries produced by one 3-hour bucket
const SLOTS_PER_BUCKET: usize = 3;

/// Default cap on hourly entries
pub const DEFAULT_HOURLY_LIMIT: usize = 24;

/// Pure projection of raw forecasts for one configured location
pub struct ForecastProjector {
    daylight: Arc<dyn DaylightPort>,
    location: GeoLocation,
    hourly_limit: usize,
}

impl fmt::Debug for ForecastProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastProjector")
            .field("location", &self.location)
            .field("hourly_limit", &self.hourly_limit)
            .finish_non_exhaustive()
    }
}

impl ForecastProjector {
    /// Create a projector for `location` with the default hourly cap
    pub fn new(daylight: Arc<dyn DaylightPort>, location: GeoLocation) -> Self {
        Self {
            daylight,
            location,
            hourly_limit: DEFAULT_HOURLY_LIMIT,
        }
    }

    /// Override the hourly cap
    #[must_use]
    pub const fn with_hourly_limit(mut self, hourly_limit: usize) -> Self {
        self.hourly_limit = hourly_limit;
        self
    }

    #[must_use]
    pub const fn location(&self) -> &GeoLocation {
        &self.location
    }

    /// Daily entries, one per daily bucket, no windowing
    pub fn daily(&self, forecast: &RawForecast) -> Vec<ForecastEntry> {
        let days = iter::successors(Some(forecast.start), |time| {
            time.checked_add_signed(TimeDelta::days(1))
        });

        forecast
            .daily
            .iter()
            .zip(days)
            .map(|(bucket, time)| ForecastEntry {
                condition: bucket.condition(),
                temperature: bucket.temperature_max,
                temperature_low: bucket.temperature_min,
                ..Self::entry(bucket, time)
            })
            .collect()
    }

    /// Hourly entries from `now` on, at most `hourly_limit` of them
    ///
    /// An entry exactly at `now` is kept.
    pub fn hourly(&self, forecast: &RawForecast, now: DateTime<Utc>) -> Vec<ForecastEntry> {
        let hours = iter::successors(Some(forecast.start), |time| {
            time.checked_add_signed(TimeDelta::hours(1))
        });

        forecast
            .three_hourly
            .iter()
            .flat_map(|bucket| iter::repeat_n(bucket, SLOTS_PER_BUCKET))
            .zip(hours)
            .filter(|(_, time)| *time >= now)
            .take(self.hourly_limit)
            .map(|(bucket, time)| ForecastEntry {
                condition: self.rewrite_for_daylight(bucket.condition(), time),
                temperature: bucket.temperature,
                ..Self::entry(bucket, time)
            })
            .collect()
    }

    /// Condition of the first 3-hour bucket, rewritten for `now`
    pub fn current_condition(
        &self,
        forecast: &RawForecast,
        now: DateTime<Utc>,
    ) -> Option<WeatherCondition> {
        let condition = forecast.three_hourly.first()?.condition();
        self.rewrite_for_daylight(condition, now)
    }

    /// `Sunny` becomes `ClearNight` when the sun is down at `instant`
    ///
    /// The oracle is only consulted for sunny conditions.
    pub fn rewrite_for_daylight(
        &self,
        condition: Option<WeatherCondition>,
        instant: DateTime<Utc>,
    ) -> Option<WeatherCondition> {
        match condition {
            Some(WeatherCondition::Sunny) => Some(
                WeatherCondition::Sunny
                    .for_daylight(self.daylight.is_daylight(instant, &self.location)),
            ),
            other => other,
        }
    }

    /// Fields shared by daily and hourly entries
    fn entry(bucket: &ForecastBucket, time: DateTime<Utc>) -> ForecastEntry {
        ForecastEntry {
            time,
            condition: None,
            temperature: None,
            temperature_low: None,
            precipitation: bucket.precipitation,
            precipitation_probability: bucket.precipitation_probability,
            wind_speed: bucket.wind_speed,
            wind_gust_speed: bucket.wind_gust,
            wind_bearing: bucket.wind_bearing,
            fresh_snow: bucket.fresh_snow,
            snow_level: bucket.snow_level,
            freezing_level: bucket.freezing_level,
            sunshine_duration: bucket.sunshine_duration,
        }
    }
}
