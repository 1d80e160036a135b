//! Meteo Euregio CLI
//!
//! Shows current conditions and forecasts from the Meteo Euregio stations
//! closest to the configured location.

#![allow(clippy::print_stdout)]

mod render;

use std::{path::PathBuf, sync::Arc};

use application::{
    ForecastProjector, RefreshCoordinator, VenueDirectoryPort, WeatherView, nearest_venue,
};
use clap::{Parser, Subcommand};
use domain::{GeoLocation, VenueClass};
use infrastructure::{
    AppConfig, MeteoEuregioAdapter, SchedulerConfig, SunriseDaylightAdapter, TaskScheduler,
    WEATHER_REFRESH_TASK, create_refresh_task, init_telemetry,
};
use tracing::{info, warn};

/// Meteo Euregio CLI
#[derive(Parser)]
#[command(name = "meteoeuregio-cli")]
#[command(author, version, about = "Meteo Euregio weather client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "METEOEUREGIO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured latitude
    #[arg(long, allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Override the configured longitude
    #[arg(long, allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current conditions at the nearest station
    Current,

    /// Show the forecast of the nearest forecast point
    Forecast {
        /// Hourly forecast instead of daily
        #[arg(long)]
        hourly: bool,
    },

    /// List venues ordered by distance
    ///
    /// Example: meteoeuregio-cli venues --class forecast --limit 5
    Venues {
        /// Venue class: observation or forecast
        #[arg(long, default_value = "observation")]
        class: VenueClass,

        /// Number of venues to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Keep refreshing and print every update until interrupted
    Watch,
}

/// Log filter for a verbosity count; `None` keeps the configured filter
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Wired application services
struct Client {
    adapter: Arc<MeteoEuregioAdapter>,
    coordinator: Arc<RefreshCoordinator>,
    view: WeatherView,
    location: GeoLocation,
}

fn assemble(config: &AppConfig) -> anyhow::Result<Client> {
    let location = config.geo_location()?;
    let adapter = Arc::new(
        MeteoEuregioAdapter::with_config(config.provider.to_meteo_config())?
            .with_timezone(config.timezone()?),
    );
    let coordinator = Arc::new(RefreshCoordinator::new(
        adapter.clone(),
        adapter.clone(),
        location,
    ));
    let projector = ForecastProjector::new(Arc::new(SunriseDaylightAdapter::new()), location)
        .with_hourly_limit(config.refresh.hourly_limit);
    let view = WeatherView::new(
        config.location.name.clone(),
        projector,
        coordinator.subscribe(),
    );

    Ok(Client {
        adapter,
        coordinator,
        view,
        location,
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    if let Some(latitude) = cli.latitude {
        config.location.latitude = Some(latitude);
    }
    if let Some(longitude) = cli.longitude {
        config.location.longitude = Some(longitude);
    }
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }

    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_current(client: &Client, json: bool) -> anyhow::Result<()> {
    let Some(current) = client.view.current() else {
        println!("No weather data available yet");
        return Ok(());
    };
    let attributes = client.view.attributes();

    if json {
        return print_json(&serde_json::json!({
            "current": current,
            "station": attributes,
            "units": client.view.units(),
        }));
    }

    print!(
        "{}",
        render::current(&current, attributes.as_ref(), client.view.units())
    );
    let state = client.view.state();
    println!(
        "{}",
        render::freshness(state.last_success, state.last_error.as_deref())
    );
    Ok(())
}

async fn watch(client: &mut Client, config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let scheduler = TaskScheduler::new(SchedulerConfig::default()).await?;
    let task = create_refresh_task(Arc::clone(&client.coordinator));
    match &config.refresh.cron {
        Some(expression) => {
            scheduler
                .add_task(WEATHER_REFRESH_TASK, expression, task)
                .await?;
        },
        None => {
            scheduler
                .add_interval_task(WEATHER_REFRESH_TASK, config.refresh.interval(), task)
                .await?;
        },
    }

    println!("👀 Watching, press Ctrl+C to stop");
    loop {
        tokio::select! {
            changed = client.view.changed() => {
                if !changed {
                    break;
                }
                println!();
                print_current(client, json)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    scheduler.stop().await?;
    if let Some(stats) = scheduler.get_task_stats(WEATHER_REFRESH_TASK) {
        println!(
            "\n📊 {} refreshes, {} failed",
            stats.success_count + stats.failure_count,
            stats.failure_count
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _telemetry = init_telemetry(&config.telemetry)?;

    let mut client = assemble(&config)?;
    info!(location = %client.location, name = %config.location.name, "Client ready");

    match cli.command {
        Commands::Venues { class, limit } => {
            let venues = client.adapter.list_venues(class).await?;
            if let Some(nearest) = nearest_venue(&venues, &client.location) {
                info!(venue_id = %nearest.id(), "Nearest {class} venue");
            }

            let mut ranked: Vec<_> = venues.iter().collect();
            // Stable sort keeps provider order among equal distances
            ranked.sort_by(|a, b| {
                a.location()
                    .squared_distance(&client.location)
                    .total_cmp(&b.location().squared_distance(&client.location))
            });
            ranked.truncate(limit);

            if cli.json {
                print_json(&ranked)?;
            } else {
                println!("📡 {} {class} venues, nearest first:", venues.len());
                print!("{}", render::venues(&ranked, &client.location));
            }
            return Ok(());
        },
        Commands::Current | Commands::Forecast { .. } | Commands::Watch => {},
    }

    // Startup refresh; a failure here aborts
    client.coordinator.refresh().await?;

    match cli.command {
        Commands::Current => print_current(&client, cli.json)?,
        Commands::Forecast { hourly } => {
            let entries = if hourly {
                client.view.hourly_forecast()
            } else {
                client.view.daily_forecast()
            }
            .unwrap_or_default();

            if cli.json {
                print_json(&entries)?;
            } else {
                let kind = if hourly { "Hourly" } else { "Daily" };
                println!("🗓️  {kind} forecast for {}", client.view.name());
                print!("{}", render::forecast(&entries, hourly));
            }
        },
        Commands::Watch => {
            print_current(&client, cli.json)?;
            if let Err(e) = watch(&mut client, &config, cli.json).await {
                warn!(error = %e, "Watch stopped");
                return Err(e);
            }
        },
        Commands::Venues { .. } => {},
    }

    Ok(())
}
