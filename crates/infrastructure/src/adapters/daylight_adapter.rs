//! Sunrise/sunset based daylight oracle

use application::ports::DaylightPort;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use domain::GeoLocation;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::warn;

/// Computes sunrise and sunset locally, no network involved
///
/// An instant counts as daylight when it falls into the sunrise-to-sunset
/// window of the UTC day before, of or after it; neighbouring days matter
/// where local days straddle UTC midnight. On dates without any sunrise
/// (polar day or night) the sun's elevation at local noon decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunriseDaylightAdapter;

impl SunriseDaylightAdapter {
    pub const fn new() -> Self {
        Self
    }

    fn window(coordinates: Coordinates, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let day = SolarDay::new(coordinates, date);
        let sunrise = day.event_time(SolarEvent::Sunrise)?;
        let sunset = day.event_time(SolarEvent::Sunset)?;
        (sunrise < sunset).then_some((sunrise, sunset))
    }

    /// Approximate solar elevation at local noon, in degrees
    fn noon_elevation(latitude: f64, date: NaiveDate) -> f64 {
        let day_of_year = f64::from(date.ordinal());
        let declination = 23.44 * (360.0 / 365.0 * (284.0 + day_of_year)).to_radians().sin();
        90.0 - (latitude - declination).abs()
    }
}

impl DaylightPort for SunriseDaylightAdapter {
    fn is_daylight(&self, instant: DateTime<Utc>, location: &GeoLocation) -> bool {
        let Some(coordinates) = Coordinates::new(location.latitude(), location.longitude()) else {
            warn!(location = %location, "Cannot compute sun events, assuming daylight");
            return true;
        };

        let date = instant.date_naive();
        let in_window = [
            date.checked_sub_days(Days::new(1)),
            Some(date),
            date.checked_add_days(Days::new(1)),
        ]
        .into_iter()
        .flatten()
        .filter_map(|day| Self::window(coordinates, day))
        .any(|(sunrise, sunset)| sunrise <= instant && instant < sunset);

        if in_window {
            return true;
        }
        if Self::window(coordinates, date).is_some() {
            return false;
        }
        Self::noon_elevation(location.latitude(), date) > 0.0
    }
}
