use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Text};
use localweather_core::{
    Config, Coordinates, HttpWeatherClient, LocationProvider, RequestOrchestrator, WeatherApi,
    location::{self, FixedLocation},
    render,
};
use std::sync::Arc;
use tracing::debug;

use crate::configure;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "localweather", version, about = "Current and recent weather for where you are")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LocationArgs {
    /// Use this latitude as the device location (requires --lon).
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Use this longitude as the device location (requires --lat).
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit backend and location settings.
    Configure,

    /// Fetch once and print the result.
    Show {
        /// Look up this city instead of using the device location.
        #[arg(long)]
        city: Option<String>,

        /// Print the view state as JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Fetch for the device location, then prompt for cities (default).
    Interactive {
        #[command(flatten)]
        location: LocationArgs,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure::run(),
            Some(Command::Show { city, json, location }) => {
                let mut orchestrator = build_orchestrator(&location)?;
                show(&mut orchestrator, city.as_deref(), json).await
            }
            Some(Command::Interactive { location }) => {
                let mut orchestrator = build_orchestrator(&location)?;
                interactive(&mut orchestrator).await
            }
            None => {
                let mut orchestrator = build_orchestrator(&LocationArgs::default())?;
                interactive(&mut orchestrator).await
            }
        }
    }
}

fn build_orchestrator(args: &LocationArgs) -> Result<RequestOrchestrator> {
    let config = Config::load()?;
    debug!(base_url = %config.base_url, mode = %config.location.mode, "loaded configuration");

    let location: Arc<dyn LocationProvider> = match args.coordinates() {
        Some(at) => {
            if !at.is_valid() {
                anyhow::bail!("Coordinates ({at}) are out of range");
            }
            Arc::new(FixedLocation::new(Some(at)))
        }
        None => location::provider_from_config(&config.location),
    };
    let weather: Arc<dyn WeatherApi> = Arc::new(HttpWeatherClient::new(config.base_url));

    Ok(RequestOrchestrator::new(location, weather))
}

async fn show(orchestrator: &mut RequestOrchestrator, city: Option<&str>, json: bool) -> Result<()> {
    match city {
        Some(city) if !city.trim().is_empty() => orchestrator.get_weather(city),
        _ => orchestrator.mount(),
    }

    let state = orchestrator.settle().await;

    if json {
        let out = serde_json::to_string_pretty(state).context("Failed to serialize view state")?;
        println!("{out}");
    } else {
        print!("{}", render(state));
    }

    Ok(())
}

async fn interactive(orchestrator: &mut RequestOrchestrator) -> Result<()> {
    orchestrator.mount();
    print!("{}", render(orchestrator.settle().await));

    loop {
        println!();
        let answer = tokio::task::spawn_blocking(|| {
            Text::new("City:")
                .with_placeholder("Enter city")
                .with_help_message("Enter to Get Weather, empty for your location, Esc to quit")
                .prompt()
        })
        .await
        .context("City prompt task failed")?;

        let city = match answer {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        orchestrator.get_weather(&city);
        print!("{}", render(orchestrator.settle().await));
    }

    Ok(())
}
