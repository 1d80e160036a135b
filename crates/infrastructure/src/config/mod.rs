//! Application configuration
//!
//! Split into focused sub-modules:
//! - `location`: display name and coordinates
//! - `provider`: Meteo Euregio endpoints and timeout
//! - `refresh`: refresh cadence and hourly forecast window
//!
//! Sources are layered: serde defaults, then an optional `config.toml`, then
//! environment variables such as `METEOEUREGIO_LOCATION__LATITUDE=47.26`.
//! Sections and keys are joined with a double underscore because keys
//! contain single underscores themselves.

mod location;
mod provider;
mod refresh;

use std::path::Path;

use domain::GeoLocation;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use location::LocationConfig;
pub use provider::ProviderConfig;
pub use refresh::RefreshConfig;

use crate::telemetry::TelemetryConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "METEOEUREGIO";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Logging and optional trace export
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from `config.toml` in the working directory (if present) and the environment
    ///
    /// The result is not validated; call [`AppConfig::validate`] once all
    /// overrides are applied.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load from an explicit file and the environment
    ///
    /// The file must exist; its format follows the extension.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!(
            location = %config.location.name,
            interval_minutes = config.refresh.interval_minutes,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check every section, reporting the first problem found
    pub fn validate(&self) -> Result<(), String> {
        self.location.validate()?;
        self.provider.validate()?;
        self.refresh.validate()
    }

    /// Validated coordinates of the configured location
    pub fn geo_location(&self) -> Result<GeoLocation, config::ConfigError> {
        self.location.to_geo_location().ok_or_else(|| {
            config::ConfigError::Message(
                "location.latitude and location.longitude must be valid coordinates".to_string(),
            )
        })
    }

    /// Zone used for provider times written without an offset
    pub fn timezone(&self) -> Result<chrono_tz::Tz, config::ConfigError> {
        self.location.tz().ok_or_else(|| {
            config::ConfigError::Message(format!(
                "location.timezone '{}' is not a known time zone",
                self.location.timezone
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_needs_a_location() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
        assert!(config.geo_location().is_err());
    }

    #[test]
    fn load_from_file_with_defaults() {
        let file = write_config(
            r#"
            [location]
            name = "Innsbruck"
            latitude = 47.2692
            longitude = 11.4041
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.location.name, "Innsbruck");
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Rome);
        assert_eq!(config.provider, ProviderConfig::default());
        assert_eq!(config.refresh, RefreshConfig::default());
        assert!(!config.telemetry.enabled);

        let location = config.geo_location().unwrap();
        assert!((location.longitude() - 11.4041).abs() < f64::EPSILON);
    }

    #[test]
    fn load_from_file_with_overrides() {
        let file = write_config(
            r#"
            [location]
            latitude = 46.4983
            longitude = 11.3548
            timezone = "Europe/Vienna"

            [provider]
            data_base_url = "http://localhost:9000/data"
            timeout_secs = 5

            [refresh]
            interval_minutes = 15
            hourly_limit = 12
            cron = "0 */15 * * * *"

            [telemetry]
            log_filter = "debug"
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.location.name, "Home");
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Vienna);
        assert_eq!(config.provider.data_base_url, "http://localhost:9000/data");
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.refresh.interval_minutes, 15);
        assert_eq!(config.refresh.hourly_limit, 12);
        assert_eq!(config.refresh.cron.as_deref(), Some("0 */15 * * * *"));
        assert_eq!(config.telemetry.log_filter, "debug");
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let file = write_config(
            r#"
            [location]
            latitude = 147.0
            longitude = 11.0
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert!(config.validate().unwrap_err().contains("location"));
        assert!(config.geo_location().is_err());
    }

    #[test]
    fn unknown_timezone_fails_validation() {
        let file = write_config(
            r#"
            [location]
            latitude = 46.0
            longitude = 11.0
            timezone = "Mars/Olympus"
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert!(config.validate().unwrap_err().contains("timezone"));
        assert!(config.timezone().is_err());
    }

    #[test]
    fn malformed_value_is_a_load_error() {
        let file = write_config(
            r#"
            [refresh]
            interval_minutes = "soon"
            "#,
        );

        assert!(AppConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from(dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_round_trip_through_json() {
        let config = AppConfig {
            location: LocationConfig {
                name: "Trento".to_string(),
                latitude: Some(46.0748),
                longitude: Some(11.1217),
                ..LocationConfig::default()
            },
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.location, config.location);
        assert!(parsed.validate().is_ok());
    }
}
