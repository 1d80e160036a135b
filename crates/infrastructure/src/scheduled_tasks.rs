//! Task closures handed to the scheduler

use std::sync::Arc;

use application::RefreshCoordinator;
use futures::future::BoxFuture;
use tracing::debug;

/// Task name of the weather refresh
pub const WEATHER_REFRESH_TASK: &str = "weather_refresh";

/// Create the weather refresh task closure
///
/// A tick that finds the previous cycle still running is skipped and counts
/// as success. Failures are reported to the scheduler; the coordinator has
/// already kept the previously published data.
pub fn create_refresh_task(
    coordinator: Arc<RefreshCoordinator>,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let coordinator = Arc::clone(&coordinator);

        Box::pin(async move {
            match coordinator.try_refresh().await {
                Ok(Some(result)) => {
                    debug!(fetched_at = %result.fetched_at, "Scheduled refresh done");
                    Ok(())
                },
                Ok(None) => {
                    debug!("Previous refresh still running, skipping tick");
                    Ok(())
                },
                Err(e) => Err(format!("Weather refresh failed: {e}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use application::error::ApplicationError;
    use application::ports::{
        ForecastBucket, Observation, RawForecast, VenueDirectoryPort, WeatherDataPort,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use domain::{GeoLocation, Venue, VenueClass, VenueId};

    use super::*;

    struct StaticDirectory {
        venues: Vec<Venue>,
    }

    #[async_trait]
    impl VenueDirectoryPort for StaticDirectory {
        async fn list_venues(&self, _class: VenueClass) -> Result<Vec<Venue>, ApplicationError> {
            Ok(self.venues.clone())
        }
    }

    struct StaticWeather {
        fail: bool,
    }

    #[async_trait]
    impl WeatherDataPort for StaticWeather {
        async fn fetch_observation(
            &self,
            _venue_id: &VenueId,
        ) -> Result<Observation, ApplicationError> {
            if self.fail {
                return Err(ApplicationError::DataUnavailable("HTTP 503".to_string()));
            }
            Ok(Observation {
                timestamp: 1_700_000_000,
                temperature: Some(4.0),
                ..Observation::default()
            })
        }

        async fn fetch_forecast(&self, _venue_id: &VenueId) -> Result<RawForecast, ApplicationError> {
            Ok(RawForecast {
                start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                three_hourly: vec![ForecastBucket::default()],
                daily: vec![ForecastBucket::default()],
            })
        }
    }

    fn coordinator(venues: Vec<Venue>, fail: bool) -> Arc<RefreshCoordinator> {
        Arc::new(RefreshCoordinator::new(
            Arc::new(StaticDirectory { venues }),
            Arc::new(StaticWeather { fail }),
            GeoLocation::innsbruck(),
        ))
    }

    fn innsbruck_venue() -> Venue {
        Venue::new("81", "Innsbruck Airport", 578, GeoLocation::innsbruck())
    }

    #[tokio::test]
    async fn refresh_task_publishes() {
        let coordinator = coordinator(vec![innsbruck_venue()], false);
        let task = create_refresh_task(Arc::clone(&coordinator));

        assert!(task().await.is_ok());
        let state = coordinator.snapshot();
        assert_eq!(state.version, 1);
        assert!(state.result.is_some());
    }

    #[tokio::test]
    async fn refresh_task_reports_failure() {
        let coordinator = coordinator(vec![innsbruck_venue()], true);
        let task = create_refresh_task(Arc::clone(&coordinator));

        let err = task().await.unwrap_err();
        assert!(err.contains("HTTP 503"));
        assert!(coordinator.snapshot().result.is_none());
    }

    #[tokio::test]
    async fn refresh_task_reports_missing_stations() {
        let coordinator = coordinator(Vec::new(), false);
        let task = create_refresh_task(coordinator);

        let err = task().await.unwrap_err();
        assert!(err.contains("Configuration error"));
    }
}
