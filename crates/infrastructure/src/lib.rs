//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the Meteo Euregio client and
//! the `sunrise` crate, and provides configuration loading, telemetry and
//! the background scheduler.

pub mod adapters;
pub mod config;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, LocationConfig, ProviderConfig, RefreshConfig};
pub use scheduled_tasks::{WEATHER_REFRESH_TASK, create_refresh_task};
pub use scheduler::{
    SchedulerConfig, SchedulerError, TaskSchedule, TaskScheduler, TaskStats, TaskStatus,
};
pub use telemetry::{TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
