use crate::{
    Config,
    error::WeatherError,
    model::{CurrentConditions, Forecast, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at `query`.
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError>;

    /// 3-hour interval forecast at `query`, in ascending timestamp order.
    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, WeatherError>;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is not an error here; every request reports
/// [`WeatherError::MissingApiKey`] instead.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    let mut provider =
        OpenWeatherProvider::new(config.api_key().map(str::to_owned), config.lang.clone());

    if let Some(url) = &config.base_url {
        provider = provider.with_base_url(url.clone());
    }

    Box::new(provider)
}
