//! Meteo Euregio endpoint settings

use integration_meteoeuregio::MeteoConfig;
use serde::{Deserialize, Serialize};

/// Provider endpoints and request settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Venue directory API (default: <https://manager.meteo.report/api>)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Observation and forecast documents (default: <https://meteo.report/var/data>)
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the client's user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_base_url() -> String {
    "https://manager.meteo.report/api".to_string()
}

fn default_data_base_url() -> String {
    "https://meteo.report/var/data".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_base_url: default_data_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ProviderConfig {
    /// Client configuration for these settings
    #[must_use]
    pub fn to_meteo_config(&self) -> MeteoConfig {
        let defaults = MeteoConfig::default();
        MeteoConfig {
            api_base_url: self.api_base_url.clone(),
            data_base_url: self.data_base_url.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        for (key, url) in [
            ("provider.api_base_url", &self.api_base_url),
            ("provider.data_base_url", &self.data_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{key} must be an http(s) URL, got '{url}'"));
            }
        }
        if self.timeout_secs == 0 {
            return Err("provider.timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}
