//! Domain layer for the Meteo Euregio weather client
//!
//! Contains the weather vocabulary shared by every other crate: venues,
//! normalized forecast entries, weather conditions and the provider's
//! sky-condition code table. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
