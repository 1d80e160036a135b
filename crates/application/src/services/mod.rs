//! Application services - Use case implementations

mod forecast_projector;
mod refresh_coordinator;
mod venue_locator;
mod weather_view;

pub use forecast_projector::{DEFAULT_HOURLY_LIMIT, ForecastProjector};
pub use refresh_coordinator::{
    NO_STATIONS_MESSAGE, RefreshCoordinator, RefreshResult, RefreshState,
};
pub use venue_locator::{VenueLocator, nearest_venue};
pub use weather_view::{CurrentConditions, StationAttributes, UNITS, WeatherUnits, WeatherView};
