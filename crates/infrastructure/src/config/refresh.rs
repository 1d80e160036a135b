//! Refresh cadence and forecast window

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Refresh settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Minutes between refresh cycles (default: 30)
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Cron expression replacing the fixed interval, e.g. "0 */30 * * * *"
    #[serde(default)]
    pub cron: Option<String>,

    /// Maximum number of hourly forecast entries (default: 24)
    #[serde(default = "default_hourly_limit")]
    pub hourly_limit: usize,
}

/// One refresh per day at the least
const MAX_INTERVAL_MINUTES: u64 = 24 * 60;

const fn default_interval_minutes() -> u64 {
    30
}

const fn default_hourly_limit() -> usize {
    24
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            cron: None,
            hourly_limit: default_hourly_limit(),
        }
    }
}

impl RefreshConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.interval_minutes == 0 {
            return Err("refresh.interval_minutes must be greater than zero".to_string());
        }
        if self.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(format!(
                "refresh.interval_minutes must be at most {MAX_INTERVAL_MINUTES}"
            ));
        }
        if self.hourly_limit == 0 {
            return Err("refresh.hourly_limit must be greater than zero".to_string());
        }
        if let Some(expression) = &self.cron {
            expression
                .parse::<cron::Schedule>()
                .map_err(|e| format!("refresh.cron '{expression}' is invalid: {e}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RefreshConfig::default();
        assert_eq!(config.interval_minutes, 30);
        assert_eq!(config.interval(), Duration::from_secs(1800));
        assert_eq!(config.hourly_limit, 24);
        assert!(config.cron.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn valid_cron_is_accepted() {
        let config = RefreshConfig {
            cron: Some("0 */15 * * * *".to_string()),
            ..RefreshConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_cron_is_rejected() {
        let config = RefreshConfig {
            cron: Some("every now and then".to_string()),
            ..RefreshConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("refresh.cron"));
    }

    #[test]
    fn zero_values_are_rejected() {
        let zero_interval = RefreshConfig {
            interval_minutes: 0,
            ..RefreshConfig::default()
        };
        assert!(zero_interval.validate().is_err());

        let zero_limit = RefreshConfig {
            hourly_limit: 0,
            ..RefreshConfig::default()
        };
        assert!(zero_limit.validate().is_err());
    }

    #[test]
    fn interval_is_bounded_to_a_day() {
        let daily = RefreshConfig {
            interval_minutes: 1440,
            ..RefreshConfig::default()
        };
        assert!(daily.validate().is_ok());
        assert_eq!(daily.interval(), Duration::from_secs(86_400));

        let too_long = RefreshConfig {
            interval_minutes: 1441,
            ..RefreshConfig::default()
        };
        assert!(too_long.validate().unwrap_err().contains("at most 1440"));
    }

    #[test]
    fn huge_interval_does_not_overflow() {
        let config = RefreshConfig {
            interval_minutes: u64::MAX,
            ..RefreshConfig::default()
        };
        assert_eq!(config.interval(), Duration::from_secs(u64::MAX));
        assert!(config.validate().is_err());
    }
}
