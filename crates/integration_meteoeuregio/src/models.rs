//! Meteo Euregio wire models
//!
//! The provider is loose with number encoding: venue coordinates and
//! measurements arrive either as JSON numbers or as numeric strings. Venue
//! fields are required and reject garbage; weather values are optional and
//! degrade to `None` when they cannot be read.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use domain::{DomainError, GeoLocation, Venue};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::MeteoError;

/// Interval key of the half-hourly observation series
const OBSERVATION_INTERVAL_KEY: &str = "30";

/// Entry of the venue directory (`/venues/?id_venue_type=N`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name_eng: String,
    /// Elevation in meters
    #[serde(deserialize_with = "lenient_f64")]
    pub elevation: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
}

impl VenueRecord {
    /// Convert to a domain venue, validating the coordinates
    ///
    /// Elevation is truncated to whole meters.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_venue(&self) -> Result<Venue, DomainError> {
        let location = GeoLocation::new(self.lat, self.lon)?;
        Ok(Venue::new(
            self.id.as_str(),
            self.name_eng.as_str(),
            self.elevation as i32,
            location,
        ))
    }
}

/// One half-hourly measurement of an observation station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Air temperature in °C
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub temperature: Option<f64>,
    /// Precipitation in mm
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rain_fall: Option<f64>,
    /// Air pressure in hPa
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub pressure: Option<f64>,
    /// Relative humidity in %
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub relative_humidity: Option<f64>,
    /// Wind speed in km/h
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub wind_speed: Option<f64>,
    /// Wind direction in degrees
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub wind_direction: Option<f64>,
}

/// Most recent record of the half-hourly observation series
#[derive(Debug, Clone, PartialEq)]
pub struct LatestObservation {
    /// The record's timestamp key, parsed as integer
    pub timestamp: i64,
    pub record: ObservationRecord,
}

/// Raw observation document (`/observations/{id}.json`)
///
/// Maps interval keys to series of timestamp-keyed records. Only the
/// half-hourly series is read.
#[derive(Debug, Deserialize)]
pub(crate) struct ObservationDocument {
    #[serde(rename = "30", default)]
    half_hourly: Option<HashMap<String, Value>>,
}

impl ObservationDocument {
    /// Select the record with the numerically largest timestamp key
    ///
    /// Keys that are not integers are skipped.
    pub(crate) fn latest(self) -> Result<LatestObservation, MeteoError> {
        let series = self.half_hourly.ok_or_else(|| {
            MeteoError::MissingData(format!(
                "No \"{OBSERVATION_INTERVAL_KEY}\" series in observation"
            ))
        })?;

        let mut latest: Option<(i64, Value)> = None;
        for (key, value) in series {
            let Ok(timestamp) = key.trim().parse::<i64>() else {
                tracing::warn!(key = %key, "Skipping observation with non-numeric key");
                continue;
            };
            if latest.as_ref().is_none_or(|(best, _)| timestamp > *best) {
                latest = Some((timestamp, value));
            }
        }

        let (timestamp, value) = latest.ok_or_else(|| {
            MeteoError::MissingData("Observation series has no numeric keys".to_string())
        })?;

        let record = serde_json::from_value(value)
            .map_err(|e| MeteoError::ParseError(format!("Invalid observation record: {e}")))?;

        Ok(LatestObservation { timestamp, record })
    }
}

/// One forecast time bucket (3-hour or daily)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketRecord {
    /// Sky condition letter `A`..=`Z`
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sky_condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub temperature_minimum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub temperature_maximum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rain_fall: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rain_probability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub wind_gust: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub wind_direction: Option<f64>,
    /// Fresh snow in cm
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub fresh_snow: Option<f64>,
    /// Snow line in m
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub snow_level: Option<f64>,
    /// Freezing level in m
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub freezing_level: Option<f64>,
    /// Sunshine duration in minutes
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub sunshine_duration: Option<f64>,
}

/// Forecast document (`/forecasts/{id}.json`)
///
/// Buckets keep the order in which they appear in the document; bucket
/// `i` covers `start + i * width`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDocument {
    /// Start of the first bucket
    #[serde(deserialize_with = "forecast_start")]
    pub start: ForecastStart,
    /// 3-hour buckets
    #[serde(rename = "180", deserialize_with = "ordered_buckets")]
    pub three_hourly: Vec<BucketRecord>,
    /// Daily buckets
    #[serde(rename = "1440", deserialize_with = "ordered_buckets")]
    pub daily: Vec<BucketRecord>,
}

/// Forecast start as written by the provider
///
/// The provider usually omits the offset and writes the wall-clock time of
/// its region. Such values only become instants once a time zone is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastStart {
    /// Written with an offset
    Absolute(DateTime<Utc>),
    /// Written without an offset
    Local(NaiveDateTime),
}

impl ForecastStart {
    /// Parse a provider timestamp
    pub fn parse(s: &str) -> Result<Self, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Absolute(dt.with_timezone(&Utc)));
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::Local(dt));
            }
        }

        Err(format!("Invalid datetime format: {s}"))
    }

    /// The instant this start denotes, reading local values in `zone`
    ///
    /// Ambiguous wall-clock times resolve to the earlier instant. Times
    /// skipped by a DST change are read one hour later.
    pub fn resolve<Tz: TimeZone>(self, zone: &Tz) -> DateTime<Utc> {
        match self {
            Self::Absolute(instant) => instant,
            Self::Local(naive) => zone
                .from_local_datetime(&naive)
                .earliest()
                .or_else(|| {
                    zone.from_local_datetime(&(naive + TimeDelta::hours(1)))
                        .earliest()
                })
                .map_or_else(
                    || Utc.from_utc_datetime(&naive),
                    |dt| dt.with_timezone(&Utc),
                ),
        }
    }
}

impl fmt::Display for ForecastStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::Local(naive) => write!(f, "{naive} (local)"),
        }
    }
}

fn forecast_start<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ForecastStart, D::Error> {
    let raw = String::deserialize(deserializer)?;
    ForecastStart::parse(raw.trim()).map_err(de::Error::custom)
}

/// Accepts either a key→bucket map (document order, keys ignored) or a list
struct OrderedBuckets;

impl<'de> Visitor<'de> for OrderedBuckets {
    type Value = Vec<BucketRecord>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map or list of forecast buckets")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut buckets = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((IgnoredAny, bucket)) = map.next_entry::<IgnoredAny, BucketRecord>()? {
            buckets.push(bucket);
        }
        Ok(buckets)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut buckets = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(bucket) = seq.next_element()? {
            buckets.push(bucket);
        }
        Ok(buckets)
    }
}

fn ordered_buckets<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<BucketRecord>, D::Error> {
    deserializer.deserialize_any(OrderedBuckets)
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    number_from_value(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a number, got {value}")))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected a string, got {other}"))),
    }
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
