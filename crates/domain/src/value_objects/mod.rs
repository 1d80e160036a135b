//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod venue_class;
mod venue_id;
mod weather_condition;

pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use venue_class::VenueClass;
pub use venue_id::VenueId;
pub use weather_condition::{SKY_CONDITIONS, SkyCondition, WeatherCondition};
