//! Meteo Euregio provider integration
//!
//! Client for the public Meteo Euregio JSON API (<https://meteo.report>),
//! the joint weather service of Tyrol, South Tyrol and Trentino.
//! No API key is required.
//!
//! Two hosts are involved: the venue directory lives on the manager API,
//! observation and forecast documents are static JSON files on the data host.

pub mod client;
mod models;

pub use client::{MeteoClient, MeteoConfig, MeteoError, MeteoEuregioClient};
pub use models::{
    BucketRecord, ForecastDocument, ForecastStart, LatestObservation, ObservationRecord, VenueRecord,
};
