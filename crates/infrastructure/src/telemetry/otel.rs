//! Subscriber setup with optional OTLP trace export
//!
//! Console logging is always installed. When export is enabled and the
//! exporter cannot be built, the client keeps running with console output
//! unless `graceful_fallback` is switched off.

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging and trace export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether OTLP trace export is enabled
    #[serde(default)]
    pub enabled: bool,

    /// OTLP gRPC endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Sampling ratio (0.0 - 1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Export timeout in seconds
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// Filter used when `RUST_LOG` is not set (e.g. "info", "application=debug")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit log lines as JSON objects
    #[serde(default)]
    pub json_logs: bool,

    /// Continue with console logging if the exporter cannot be built
    #[serde(default = "default_graceful_fallback")]
    pub graceful_fallback: bool,
}

const fn default_sampling_ratio() -> f64 {
    1.0
}

const fn default_export_timeout() -> u64 {
    10
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "meteoeuregio".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

const fn default_graceful_fallback() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
            export_timeout_secs: default_export_timeout(),
            log_filter: default_log_filter(),
            json_logs: false,
            graceful_fallback: default_graceful_fallback(),
        }
    }
}

impl TelemetryConfig {
    fn sampler(&self) -> Sampler {
        if (self.sampling_ratio - 1.0).abs() < f64::EPSILON || self.sampling_ratio > 1.0 {
            Sampler::AlwaysOn
        } else if self.sampling_ratio <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sampling_ratio)
        }
    }
}

/// Keeps the tracer provider alive; flushes pending spans on drop
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("exporting", &self.provider.is_some())
            .finish()
    }
}

impl TelemetryGuard {
    /// Whether spans are being exported
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::error!(error = ?e, "Failed to shut down tracer provider");
            }
        }
    }
}

/// Install the global subscriber
///
/// Keep the returned guard alive for the lifetime of the process. `RUST_LOG`
/// takes precedence over `log_filter`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    if !config.enabled {
        install(config, None)?;
        info!("Telemetry initialized (console only)");
        return Ok(TelemetryGuard { provider: None });
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_timeout(Duration::from_secs(config.export_timeout_secs))
        .build();

    match exporter {
        Ok(exporter) => {
            let provider = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_sampler(config.sampler())
                .with_resource(
                    Resource::builder()
                        .with_service_name(config.service_name.clone())
                        .build(),
                )
                .build();

            install(config, Some(&provider))?;
            info!(
                endpoint = %config.endpoint,
                service = %config.service_name,
                sampling = config.sampling_ratio,
                "Telemetry initialized with OTLP export"
            );
            Ok(TelemetryGuard {
                provider: Some(provider),
            })
        },
        Err(e) if config.graceful_fallback => {
            install(config, None)?;
            warn!(
                endpoint = %config.endpoint,
                error = %e,
                "OTLP exporter unavailable, falling back to console logging"
            );
            Ok(TelemetryGuard { provider: None })
        },
        Err(e) => Err(TelemetryError::Exporter(e.to_string())),
    }
}

fn install(
    config: &TelemetryConfig,
    provider: Option<&SdkTracerProvider>,
) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    // stdout belongs to command output
    let json_layer = config
        .json_logs
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!config.json_logs).then(|| fmt::layer().with_writer(std::io::stderr));
    let otel_layer =
        provider.map(|p| OpenTelemetryLayer::new(p.tracer(config.service_name.clone())));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

/// Telemetry initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Global subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// OTLP exporter could not be built
    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(String),
}
