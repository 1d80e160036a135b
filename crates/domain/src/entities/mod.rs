//! Domain entities - Objects with identity and lifecycle

mod forecast_entry;
mod venue;

pub use forecast_entry::ForecastEntry;
pub use venue::Venue;
