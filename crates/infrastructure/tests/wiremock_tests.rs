//! Integration tests for the infrastructure crate
//!
//! Tests cover:
//! - Provider adapter and refresh coordinator against a mock server
//! - Projection through the sunrise-based daylight adapter
//! - Configuration loading from files

use std::sync::Arc;

use application::{ApplicationError, ForecastProjector, RefreshCoordinator, WeatherView};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use domain::{GeoLocation, WeatherCondition};
use infrastructure::{MeteoEuregioAdapter, SunriseDaylightAdapter};
use integration_meteoeuregio::MeteoConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn home() -> GeoLocation {
    GeoLocation::new(47.05, 11.05).unwrap()
}

fn stations() -> serde_json::Value {
    serde_json::json!([
        {"id": "A", "name_eng": "Station A", "elevation": "580", "lat": "47.0", "lon": "11.0"},
        {"id": "B", "name_eng": "Station B", "elevation": 1200, "lat": 47.1, "lon": 11.3}
    ])
}

fn forecast_points() -> serde_json::Value {
    serde_json::json!([
        {"id": "F-north", "name_eng": "North", "elevation": 900, "lat": 47.5, "lon": 11.0},
        {"id": "F-home", "name_eng": "Home", "elevation": 600, "lat": 47.06, "lon": 11.04}
    ])
}

fn observation() -> serde_json::Value {
    serde_json::json!({
        "30": {
            "100": {"temperature": 5.0, "pressure": 1012.0},
            "200": {"temperature": "7.1", "rain_fall": 0.2, "pressure": "1013.5",
                    "relative_humidity": 78, "wind_speed": 5.4, "wind_direction": 210}
        }
    })
}

fn forecast() -> serde_json::Value {
    // Local CET wall clock for `start()`
    serde_json::json!({
        "start": "2024-01-01T01:00:00",
        "180": {
            "0": {"sky_condition": "A", "temperature": -2.0},
            "3": {"sky_condition": "C", "temperature": 1.5},
            "6": {"sky_condition": "N", "temperature": 0.5, "fresh_snow": 2}
        },
        "1440": {
            "0": {"sky_condition": "B", "temperature_minimum": -5, "temperature_maximum": 3},
            "1": {"sky_condition": "P", "temperature_minimum": -7, "temperature_maximum": -1}
        }
    })
}

fn adapter(server: &MockServer) -> Arc<MeteoEuregioAdapter> {
    let config = MeteoConfig {
        api_base_url: format!("{}/api", server.uri()),
        data_base_url: format!("{}/var/data", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    };
    Arc::new(MeteoEuregioAdapter::with_config(config).unwrap())
}

fn coordinator(server: &MockServer) -> RefreshCoordinator {
    let adapter = adapter(server);
    RefreshCoordinator::new(adapter.clone(), adapter, home())
}

async fn mount_directory(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/venues/"))
        .and(query_param("id_venue_type", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations()))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/venues/"))
        .and(query_param("id_venue_type", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_points()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/var/data/forecasts/F-home.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast()))
        .mount(server)
        .await;
}

// ============================================================================
// Refresh Cycle Tests
// ============================================================================

mod refresh_tests {
    use super::*;

    #[tokio::test]
    async fn refresh_resolves_nearest_venues_and_publishes() {
        let server = MockServer::start().await;
        mount_directory(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/var/data/observations/A.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observation()))
            .expect(1)
            .mount(&server)
            .await;
        mount_forecast(&server).await;

        let coordinator = coordinator(&server);
        let result = coordinator.refresh().await.unwrap();

        assert_eq!(result.observation.timestamp, 200);
        assert_eq!(result.observation.temperature, Some(7.1));
        assert_eq!(result.observation.pressure, Some(1013.5));
        assert_eq!(result.forecast.start, start());
        assert_eq!(result.forecast.three_hourly.len(), 3);
        assert_eq!(result.forecast.daily.len(), 2);

        let state = coordinator.snapshot();
        assert_eq!(state.version, 1);
        assert_eq!(state.observation_venue.unwrap().id().as_str(), "A");
    }

    #[tokio::test]
    async fn second_refresh_makes_no_directory_request() {
        let server = MockServer::start().await;
        mount_directory(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/var/data/observations/A.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observation()))
            .expect(2)
            .mount(&server)
            .await;
        mount_forecast(&server).await;

        let coordinator = coordinator(&server);
        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap();

        assert_eq!(coordinator.snapshot().version, 2);
        // Directory expectations are verified when the server drops
    }

    #[tokio::test]
    async fn empty_directory_is_a_configuration_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/venues/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let err = coordinator.refresh().await.unwrap_err();

        assert!(matches!(err, ApplicationError::Configuration(_)));
        let state = coordinator.snapshot();
        assert!(state.result.is_none());
        assert!(state.last_error.is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_result() {
        let server = MockServer::start().await;
        mount_directory(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/var/data/observations/A.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observation()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/var/data/observations/A.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        mount_forecast(&server).await;

        let coordinator = coordinator(&server);
        let first = coordinator.refresh().await.unwrap();

        let err = coordinator.refresh().await.unwrap_err();
        assert!(matches!(err, ApplicationError::DataUnavailable(_)));

        let state = coordinator.snapshot();
        let kept = state.result.unwrap();
        assert!(Arc::ptr_eq(&kept, &first));
        assert_eq!(state.version, 2);
        assert!(state.last_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn malformed_forecast_publishes_nothing() {
        let server = MockServer::start().await;
        mount_directory(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/var/data/observations/A.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observation()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/var/data/forecasts/F-home.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"start\": "))
            .mount(&server)
            .await;

        let coordinator = coordinator(&server);
        let err = coordinator.refresh().await.unwrap_err();

        assert!(matches!(err, ApplicationError::DataUnavailable(_)));
        assert!(coordinator.snapshot().result.is_none());
    }

    #[tokio::test]
    async fn out_of_range_venue_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/venues/"))
            .and(query_param("id_venue_type", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "broken", "name_eng": "Broken", "elevation": 0, "lat": 147.05, "lon": 11.05},
                {"id": "B", "name_eng": "Station B", "elevation": 1200, "lat": 47.1, "lon": 11.3}
            ])))
            .mount(&server)
            .await;

        let venues = application::VenueDirectoryPort::list_venues(
            adapter(&server).as_ref(),
            domain::VenueClass::Observation,
        )
        .await
        .unwrap();

        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].id().as_str(), "B");
    }
}

// ============================================================================
// Projection Tests
// ============================================================================

mod projection_tests {
    use super::*;

    async fn published_view(server: &MockServer) -> WeatherView {
        mount_directory(server, 1).await;
        Mock::given(method("GET"))
            .and(path("/var/data/observations/A.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(observation()))
            .mount(server)
            .await;
        mount_forecast(server).await;

        let coordinator = coordinator(server);
        coordinator.refresh().await.unwrap();

        let projector = ForecastProjector::new(Arc::new(SunriseDaylightAdapter::new()), home());
        WeatherView::new("Home", projector, coordinator.subscribe())
    }

    #[tokio::test]
    async fn sunny_bucket_before_dawn_reads_clear_night() {
        let server = MockServer::start().await;
        let view = published_view(&server).await;

        let current = view.current_at(start() + TimeDelta::hours(1)).unwrap();
        assert_eq!(current.temperature, Some(7.1));
        assert_eq!(current.condition, Some(WeatherCondition::ClearNight));

        let hourly = view.hourly_forecast_at(start()).unwrap();
        assert_eq!(hourly.len(), 9);
        assert_eq!(hourly[0].condition, Some(WeatherCondition::ClearNight));
        assert_eq!(hourly[0].temperature, Some(-2.0));
    }

    #[tokio::test]
    async fn hourly_window_starts_at_now() {
        let server = MockServer::start().await;
        let view = published_view(&server).await;

        let now = start() + TimeDelta::hours(5) + TimeDelta::minutes(1);
        let hourly = view.hourly_forecast_at(now).unwrap();

        assert_eq!(hourly.len(), 3);
        assert_eq!(hourly[0].time, start() + TimeDelta::hours(6));
        assert_eq!(hourly[0].fresh_snow, Some(2.0));
        assert!(hourly.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[tokio::test]
    async fn daily_forecast_steps_by_day() {
        let server = MockServer::start().await;
        let view = published_view(&server).await;

        let daily = view.daily_forecast().unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].time, start());
        assert_eq!(daily[0].temperature, Some(3.0));
        assert_eq!(daily[0].temperature_low, Some(-5.0));
        assert_eq!(daily[1].time, start() + TimeDelta::days(1));
        assert_eq!(daily[1].temperature_low, Some(-7.0));
    }

    #[tokio::test]
    async fn attributes_describe_observation_station() {
        let server = MockServer::start().await;
        let view = published_view(&server).await;

        let attributes = view.attributes().unwrap();
        assert_eq!(attributes.name, "Home");
        assert_eq!(attributes.station_id, "A");
        assert_eq!(attributes.station_name, "Station A");
        assert_eq!(attributes.altitude, 580);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use std::io::Write;

    use infrastructure::AppConfig;

    #[test]
    fn config_file_drives_client_settings() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"
            [location]
            name = "Bozen"
            latitude = 46.4983
            longitude = 11.3548

            [provider]
            api_base_url = "http://127.0.0.1:1/api"
            timeout_secs = 2
            "#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        let meteo = config.provider.to_meteo_config();

        assert_eq!(meteo.api_base_url, "http://127.0.0.1:1/api");
        assert_eq!(meteo.data_base_url, "https://meteo.report/var/data");
        assert_eq!(meteo.timeout_secs, 2);
        assert_eq!(config.location.name, "Bozen");
        assert!(config.geo_location().is_ok());
    }
}
