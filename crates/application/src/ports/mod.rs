//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod daylight_port;
mod venue_directory_port;
mod weather_data_port;

#[cfg(test)]
pub use daylight_port::MockDaylightPort;
pub use daylight_port::DaylightPort;
#[cfg(test)]
pub use venue_directory_port::MockVenueDirectoryPort;
pub use venue_directory_port::VenueDirectoryPort;
#[cfg(test)]
pub use weather_data_port::MockWeatherDataPort;
pub use weather_data_port::{ForecastBucket, Observation, RawForecast, WeatherDataPort};
