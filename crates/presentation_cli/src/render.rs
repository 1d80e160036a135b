//! Plain-text rendering of weather data

use std::fmt::Write as _;

use application::{CurrentConditions, StationAttributes, WeatherUnits};
use chrono::{DateTime, Local, Utc};
use domain::{ForecastEntry, GeoLocation, Venue};

fn value(v: Option<f64>, unit: &str) -> String {
    v.map_or_else(|| "--".to_string(), |v| format!("{v:.1} {unit}"))
}

/// Current conditions block
pub fn current(
    conditions: &CurrentConditions,
    attributes: Option<&StationAttributes>,
    units: WeatherUnits,
) -> String {
    let mut out = String::new();
    if let Some(attributes) = attributes {
        let _ = writeln!(
            out,
            "📍 {} (station {} [{}], {} m)",
            attributes.name, attributes.station_name, attributes.station_id, attributes.altitude
        );
    }

    let condition = conditions
        .condition
        .map_or_else(|| "unknown".to_string(), |c| format!("{} {c}", c.emoji()));
    let _ = writeln!(out, "   Condition:     {condition}");
    let _ = writeln!(
        out,
        "   Temperature:   {}",
        value(conditions.temperature, units.temperature)
    );
    let _ = writeln!(
        out,
        "   Precipitation: {}",
        value(conditions.precipitation, units.precipitation)
    );
    let _ = writeln!(
        out,
        "   Pressure:      {}",
        value(conditions.pressure, units.pressure)
    );
    let _ = writeln!(out, "   Humidity:      {}", value(conditions.humidity, "%"));

    let bearing = conditions
        .wind_bearing
        .map_or_else(String::new, |b| format!(" from {b:.0}°"));
    let _ = writeln!(
        out,
        "   Wind:          {}{bearing}",
        value(conditions.wind_speed, units.wind_speed)
    );
    out
}

/// One line per forecast entry, times in local time
pub fn forecast(entries: &[ForecastEntry], hourly: bool) -> String {
    if entries.is_empty() {
        return "   (no forecast entries)\n".to_string();
    }

    let format = if hourly { "%a %H:%M" } else { "%a %d %b" };
    entries
        .iter()
        .map(|entry| {
            let local: DateTime<Local> = entry.time.with_timezone(&Local);
            let mut line = format!("   {}  {}", local.format(format), entry.summary());
            if let Some(probability) = entry.precipitation_probability {
                let _ = write!(line, " ({probability:.0}%)");
            }
            if let Some(snow) = entry.fresh_snow.filter(|s| *s > 0.0) {
                let _ = write!(line, ", ❄️ {snow:.0} cm");
            }
            line.push('\n');
            line
        })
        .collect()
}

/// Venue listing, closest first, with the distance from `origin`
pub fn venues(venues: &[&Venue], origin: &GeoLocation) -> String {
    venues
        .iter()
        .enumerate()
        .map(|(i, venue)| {
            let marker = if i == 0 { "→" } else { " " };
            format!(
                " {marker} {venue}  {:.1} km\n",
                venue.location().distance_km(origin)
            )
        })
        .collect()
}

/// Footer describing data freshness
pub fn freshness(last_success: Option<DateTime<Utc>>, last_error: Option<&str>) -> String {
    let updated = last_success.map_or_else(
        || "never".to_string(),
        |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
    );
    match last_error {
        Some(error) => format!("⚠️  Last refresh failed: {error} (data from {updated})"),
        None => format!("🕒 Updated {updated}"),
    }
}
