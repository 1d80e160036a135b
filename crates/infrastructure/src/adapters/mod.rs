//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod daylight_adapter;
mod meteo_adapter;

pub use daylight_adapter::SunriseDaylightAdapter;
pub use meteo_adapter::MeteoEuregioAdapter;
