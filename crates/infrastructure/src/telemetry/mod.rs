//! Logging and trace export
//!
//! Console logging through `tracing-subscriber`, optionally mirrored to an
//! OTLP collector.

mod otel;

pub use otel::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
