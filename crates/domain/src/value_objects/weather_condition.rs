//! Weather conditions and the provider's sky-condition code table
//!
//! The provider encodes the sky state as a single letter `A`..=`Z`
//! (<https://manager.meteo.report/api/sky_conditions/>). Each letter maps to
//! exactly one normalized [`WeatherCondition`]; the mapping lives in the
//! static [`SKY_CONDITIONS`] table.

use serde::{Deserialize, Serialize};

/// Normalized weather condition exposed to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    /// Clear sky during daylight
    #[serde(rename = "sunny")]
    Sunny,
    /// Clear sky while the sun is below the horizon
    #[serde(rename = "clear-night")]
    ClearNight,
    /// Partly cloudy
    #[serde(rename = "partlycloudy")]
    PartlyCloudy,
    /// Cloudy / overcast
    #[serde(rename = "cloudy")]
    Cloudy,
    /// Rain or showers
    #[serde(rename = "rainy")]
    Rainy,
    /// Heavy rain or heavy showers
    #[serde(rename = "pouring")]
    Pouring,
    /// Snow
    #[serde(rename = "snowy")]
    Snowy,
    /// Wet snow / sleet
    #[serde(rename = "snowy-rainy")]
    SnowyRainy,
    /// Fog or haze
    #[serde(rename = "fog")]
    Fog,
    /// Unstable conditions
    #[serde(rename = "exceptional")]
    Exceptional,
    /// Thunderstorm
    #[serde(rename = "lightning")]
    Lightning,
    /// Thunderstorm with precipitation
    #[serde(rename = "lightning-rainy")]
    LightningRainy,
}

impl WeatherCondition {
    /// Canonical identifier, identical to the serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::ClearNight => "clear-night",
            Self::PartlyCloudy => "partlycloudy",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Pouring => "pouring",
            Self::Snowy => "snowy",
            Self::SnowyRainy => "snowy-rainy",
            Self::Fog => "fog",
            Self::Exceptional => "exceptional",
            Self::Lightning => "lightning",
            Self::LightningRainy => "lightning-rainy",
        }
    }

    /// Get an emoji representation of the weather condition
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Sunny => "☀️",
            Self::ClearNight => "🌙",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁️",
            Self::Rainy | Self::Pouring => "🌧️",
            Self::Snowy => "❄️",
            Self::SnowyRainy => "🌨️",
            Self::Fog => "🌫️",
            Self::Exceptional => "⚠️",
            Self::Lightning | Self::LightningRainy => "⛈️",
        }
    }

    /// Resolve a provider sky-condition code
    ///
    /// Returns `None` for empty, unknown or multi-letter codes.
    #[must_use]
    pub fn from_sky_code(code: &str) -> Option<Self> {
        SkyCondition::from_code(code).map(|sky| sky.condition)
    }

    /// Swap `Sunny` for `ClearNight` when the sun is down
    #[must_use]
    pub const fn for_daylight(self, is_daylight: bool) -> Self {
        match self {
            Self::Sunny if !is_daylight => Self::ClearNight,
            other => other,
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the provider's sky-condition code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyCondition {
    /// Provider letter code
    pub code: char,
    /// Provider description of the code
    pub description: &'static str,
    /// Normalized condition
    pub condition: WeatherCondition,
}

const fn sky(code: char, description: &'static str, condition: WeatherCondition) -> SkyCondition {
    SkyCondition {
        code,
        description,
        condition,
    }
}

/// Sky-condition codes `A`..=`Z`, indexed by `code - 'A'`
pub static SKY_CONDITIONS: [SkyCondition; 26] = [
    sky('A', "Clear sky", WeatherCondition::Sunny),
    sky('B', "Sunny", WeatherCondition::Sunny),
    sky('C', "Partly cloudy", WeatherCondition::PartlyCloudy),
    sky('D', "Mostly cloudy", WeatherCondition::Cloudy),
    sky('E', "Cloudy", WeatherCondition::Cloudy),
    sky('F', "Showers", WeatherCondition::Rainy),
    sky('G', "Heavy showers", WeatherCondition::Pouring),
    sky('H', "Moderate rainfall", WeatherCondition::Rainy),
    sky('I', "Heavy rainfall", WeatherCondition::Pouring),
    sky('J', "Light rainfall", WeatherCondition::Rainy),
    sky('K', "Light showers", WeatherCondition::Rainy),
    sky('L', "Light snow and sun", WeatherCondition::Snowy),
    sky('M', "Snow and sun", WeatherCondition::Snowy),
    sky('N', "Light snow", WeatherCondition::Snowy),
    sky('O', "Moderate snow", WeatherCondition::Snowy),
    sky('P', "Heavy snow", WeatherCondition::Snowy),
    sky('Q', "Wet snow and sun", WeatherCondition::SnowyRainy),
    sky('R', "Wet snow", WeatherCondition::SnowyRainy),
    sky('S', "Haze", WeatherCondition::Fog),
    sky('T', "Mountain haze", WeatherCondition::Fog),
    sky('U', "Unstable", WeatherCondition::Exceptional),
    sky('V', "Thunderstorm", WeatherCondition::Lightning),
    sky('W', "Unstable with wet snow", WeatherCondition::SnowyRainy),
    sky('X', "Wet snow thunderstorm", WeatherCondition::LightningRainy),
    sky('Y', "Unstable with snow thunderstorm", WeatherCondition::LightningRainy),
    sky('Z', "Snow thunderstorm", WeatherCondition::LightningRainy),
];

impl SkyCondition {
    /// Look up a provider code (exact, uppercase, single letter)
    #[must_use]
    pub fn from_code(code: &str) -> Option<&'static Self> {
        let mut chars = code.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return None;
        };
        if !letter.is_ascii_uppercase() {
            return None;
        }
        SKY_CONDITIONS.get(letter as usize - 'A' as usize)
    }
}
