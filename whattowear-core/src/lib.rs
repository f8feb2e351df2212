//! Core library for the `whattowear` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution with a fallback city
//! - The OpenWeather provider and shared domain models
//! - Daily aggregation of the 3-hour forecast
//! - Presentation helpers and the view-state reducer
//!
//! It is used by `whattowear-cli`, but can also drive other front ends.

pub mod config;
pub mod display;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::{aggregate, samples_for_day};
pub use location::{LocationResolver, LocationSource};
pub use model::{
    Condition, Coordinates, CurrentConditions, DailySummary, Forecast, IntervalSample,
    LocationQuery, TemperatureStats,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use session::Session;
pub use state::{AppState, reduce};
