use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};
use whattowear_core::{
    Config, Coordinates, LocationResolver, Session,
    config::API_KEY_ENV,
    location::{FixedLocation, Unavailable},
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "whattowear", version, about = "Weather and clothing advice")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, fallback city and language interactively.
    Configure,

    /// Show current weather, advice and the daily forecast.
    Show {
        /// City to look up; if absent, the current location is used.
        city: Option<String>,

        /// Latitude to look up instead of locating.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to look up instead of locating.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Show 3-hour detail for a day: 0 = today, 1 = tomorrow, ...
        #[arg(long, default_value_t = 0)]
        day: u32,

        /// Skip location lookup and go straight to the fallback city.
        #[arg(long)]
        no_locate: bool,

        /// Print the view state as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the config file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, day, no_locate, json } => {
                let config =
                    load_config(&Config::config_file_path()?, std::env::var(API_KEY_ENV).ok())?;
                let resolver = resolver_for(&config, lat.zip(lon), no_locate);
                let mut session = Session::new(provider_from_config(&config), resolver);

                let state = match city {
                    Some(city) => session.search(&city).await,
                    None => session.load_initial().await,
                };
                tracing::debug!(
                    request_id = state.request_id,
                    query = ?state.query,
                    error = ?state.error,
                    "lookup finished"
                );

                if json {
                    let out = serde_json::to_string_pretty(state)
                        .context("Failed to serialize weather state")?;
                    println!("{out}");
                } else {
                    print!("{}", render::render(state, day, chrono::Utc::now())?);
                }
                Ok(())
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

/// Read the config at `path` and apply the key from the environment, if any.
fn load_config(path: &Path, env_key: Option<String>) -> anyhow::Result<Config> {
    let from_env = env_key.as_deref().is_some_and(|k| !k.trim().is_empty());
    let config = Config::load_from(path)?.with_api_key_override(env_key);

    tracing::debug!(
        path = %path.display(),
        exists = path.exists(),
        key_from_env = from_env,
        has_key = config.api_key().is_some(),
        "loaded configuration"
    );
    if config.api_key().is_none() {
        tracing::warn!("no API key configured; run `whattowear configure` or set {API_KEY_ENV}");
    }

    Ok(config)
}

fn resolver_for(config: &Config, coords: Option<(f64, f64)>, no_locate: bool) -> LocationResolver {
    match coords {
        Some((lat, lon)) => LocationResolver::new(
            Box::new(FixedLocation(Coordinates::new(lat, lon))),
            config.fallback_city(),
        ),
        None if no_locate => LocationResolver::new(Box::new(Unavailable), config.fallback_city()),
        None => LocationResolver::from_config(config),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key (leave empty to keep current):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_string());
    }

    config.default_city = Text::new("Fallback city:").with_default(config.fallback_city()).prompt()?;
    config.lang = Text::new("Description language:").with_default(&config.lang).prompt()?;
    config.locate = Confirm::new("Locate by IP address when no city is given?")
        .with_default(config.locate)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
