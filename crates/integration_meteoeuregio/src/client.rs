//! Meteo Euregio HTTP client
//!
//! Fetches the venue directory, observation documents and forecast documents.
//! Every request is bounded by the configured timeout; there are no retries.

use async_trait::async_trait;
use domain::VenueClass;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ForecastDocument, LatestObservation, ObservationDocument, VenueRecord};

/// Meteo Euregio client errors
#[derive(Debug, Error)]
pub enum MeteoError {
    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the provider failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the provider
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response was well-formed but lacked the expected data
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteoConfig {
    /// Manager API base URL (default: <https://manager.meteo.report/api>)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Static data base URL (default: <https://meteo.report/var/data>)
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    "https://manager.meteo.report/api".to_string()
}

fn default_data_base_url() -> String {
    "https://meteo.report/var/data".to_string()
}

const fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("meteoeuregio-client/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for MeteoConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_base_url: default_data_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Client trait for the Meteo Euregio endpoints
#[async_trait]
pub trait MeteoClient: Send + Sync {
    /// Fetch the full venue directory for a class, in provider order
    async fn fetch_venues(&self, class: VenueClass) -> Result<Vec<VenueRecord>, MeteoError>;

    /// Fetch the latest half-hourly observation of a station
    async fn fetch_observation(&self, venue_id: &str) -> Result<LatestObservation, MeteoError>;

    /// Fetch the forecast document of a forecast venue
    async fn fetch_forecast(&self, venue_id: &str) -> Result<ForecastDocument, MeteoError>;
}

/// reqwest-based implementation of [`MeteoClient`]
#[derive(Debug)]
pub struct MeteoEuregioClient {
    client: Client,
    config: MeteoConfig,
}

impl MeteoEuregioClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: MeteoConfig) -> Result<Self, MeteoError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MeteoError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, MeteoError> {
        Self::new(MeteoConfig::default())
    }

    fn venues_url(&self) -> String {
        format!("{}/venues/", self.config.api_base_url.trim_end_matches('/'))
    }

    fn observation_url(&self, venue_id: &str) -> String {
        format!(
            "{}/observations/{venue_id}.json",
            self.config.data_base_url.trim_end_matches('/')
        )
    }

    fn forecast_url(&self, venue_id: &str) -> String {
        format!(
            "{}/forecasts/{venue_id}.json",
            self.config.data_base_url.trim_end_matches('/')
        )
    }

    /// Map non-success statuses to errors
    fn check_status(response: Response) -> Result<Response, MeteoError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MeteoError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(MeteoError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(MeteoError::RequestFailed(format!("HTTP {status}")));
        }
        Ok(response)
    }

    fn request_error(e: &reqwest::Error) -> MeteoError {
        if e.is_connect() {
            MeteoError::ConnectionFailed(e.to_string())
        } else {
            MeteoError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl MeteoClient for MeteoEuregioClient {
    #[instrument(skip(self), fields(venue_type = class.type_id()))]
    async fn fetch_venues(&self, class: VenueClass) -> Result<Vec<VenueRecord>, MeteoError> {
        let url = self.venues_url();
        debug!(url = %url, "Fetching venue directory");

        let response = self
            .client
            .get(&url)
            .query(&[("id_venue_type", class.type_id())])
            .send()
            .await
            .map_err(|e| Self::request_error(&e))?;

        let venues: Vec<VenueRecord> = Self::check_status(response)?
            .json()
            .await
            .map_err(|e| MeteoError::ParseError(e.to_string()))?;

        debug!(count = venues.len(), "Venue directory received");
        Ok(venues)
    }

    #[instrument(skip(self))]
    async fn fetch_observation(&self, venue_id: &str) -> Result<LatestObservation, MeteoError> {
        let url = self.observation_url(venue_id);
        debug!(url = %url, "Fetching observation");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::request_error(&e))?;

        let document: ObservationDocument = Self::check_status(response)?
            .json()
            .await
            .map_err(|e| MeteoError::ParseError(e.to_string()))?;

        document.latest()
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, venue_id: &str) -> Result<ForecastDocument, MeteoError> {
        let url = self.forecast_url(venue_id);
        debug!(url = %url, "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::request_error(&e))?;

        let document: ForecastDocument = Self::check_status(response)?
            .json()
            .await
            .map_err(|e| MeteoError::ParseError(e.to_string()))?;

        debug!(
            start = %document.start,
            three_hourly = document.three_hourly.len(),
            daily = document.daily.len(),
            "Forecast received"
        );
        Ok(document)
    }
}
