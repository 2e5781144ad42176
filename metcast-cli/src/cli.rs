use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Text};
use metcast_core::{
    Config, Coordinates, FixedSensor, GeocoderId, HourOfDay, SearchQuery, Session,
    TemperatureUnit, WeatherLookup,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "metcast", version, about = "Weather lookup backed by met.no")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a geocoder and make it the default.
    Configure {
        /// Geocoder short name, "google" or "nominatim".
        geocoder: String,
    },

    /// Show the forecast for a place name.
    Show {
        /// Place name or address, e.g. "Oslo".
        place: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show the forecast for the device position.
    Here {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Hour of day (UTC) for the 3-day strip.
    #[arg(long, default_value = "12:00")]
    hour: HourOfDay,

    /// Show temperatures in Fahrenheit.
    #[arg(long)]
    fahrenheit: bool,

    /// Print the resulting state as JSON.
    #[arg(long)]
    json: bool,
}

impl DisplayArgs {
    fn unit(&self) -> TemperatureUnit {
        if self.fahrenheit { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { geocoder } => configure(&geocoder),
            Command::Show { place, display } => {
                lookup(SearchQuery::Place(&place), &display).await
            }
            Command::Here { lat, lon, display } => {
                let sensor = FixedSensor(Coordinates::new(lat, lon));
                lookup(SearchQuery::Device(&sensor), &display).await
            }
        }
    }
}

fn configure(geocoder: &str) -> anyhow::Result<()> {
    let id = GeocoderId::try_from(geocoder)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let key = Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        config.upsert_geocoder_api_key(id, key.trim().to_string());
    }

    let base_url = Text::new("Custom endpoint (leave empty for the default):")
        .prompt()
        .context("Failed to read endpoint")?;
    if !base_url.trim().is_empty() {
        config.geocoders.entry(id.as_str().to_string()).or_default().base_url =
            Some(base_url.trim().to_string());
    }

    config.set_default_geocoder(id);
    config.save()?;

    println!("Saved {} as the default geocoder ({}).", id, Config::config_file_path()?.display());
    Ok(())
}

async fn lookup(query: SearchQuery<'_>, display: &DisplayArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let lookup = WeatherLookup::from_config(&config)?.with_hour(display.hour);
    let session = Session::new(display.unit());

    let state = lookup.search(&session, query).await;

    if display.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render::render(&state));
    }
    Ok(())
}
