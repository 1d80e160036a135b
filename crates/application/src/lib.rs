//! Application layer - Use cases and orchestration
//!
//! Contains the refresh orchestration, nearest-venue resolution and forecast
//! projection, plus the port definitions implemented by infrastructure
//! adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
