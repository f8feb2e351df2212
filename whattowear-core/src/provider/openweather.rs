use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    error::WeatherError,
    model::{Condition, Coordinates, CurrentConditions, Forecast, IntervalSample, LocationQuery},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    lang: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, lang: String) -> Self {
        Self { api_key, lang, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params: Vec<(&str, String)> = match query {
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.latitude.to_string()), ("lon", c.longitude.to_string())]
            }
            LocationQuery::City(name) => vec![("q", name.trim().to_string())],
        };
        params.push(("units", "metric".to_string()));
        params.push(("lang", self.lang.clone()));
        params.push(("appid", api_key.to_string()));

        tracing::debug!(%url, %query, "requesting OpenWeather {endpoint}");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        // Only a city name can fail to match; a 404 for coordinates is an upstream fault.
        if let (StatusCode::NOT_FOUND, LocationQuery::City(name)) = (status, query) {
            return Err(WeatherError::CityNotFound(name.trim().to_string()));
        }

        if !status.is_success() {
            return Err(WeatherError::Upstream { status, body: truncate_body(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: Option<OwCoord>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    dt_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn first_condition(weather: Vec<OwWeather>) -> Option<Condition> {
    weather
        .into_iter()
        .next()
        .map(|w| Condition { icon: w.icon, description: w.description })
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        CurrentConditions {
            location_name: parsed.name,
            country: parsed.sys.country,
            coordinates: parsed.coord.map(|c| Coordinates::new(c.lat, c.lon)),
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            condition: first_condition(parsed.weather),
            sunrise: parsed.sys.sunrise.and_then(unix_to_utc),
            sunset: parsed.sys.sunset.and_then(unix_to_utc),
            observed_at: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
            utc_offset_seconds: parsed.timezone,
        }
    }
}

impl From<OwForecastEntry> for IntervalSample {
    fn from(entry: OwForecastEntry) -> Self {
        IntervalSample {
            timestamp: entry.dt,
            temperature_c: entry.main.temp,
            feels_like_c: entry.main.feels_like,
            humidity_pct: entry.main.humidity,
            wind_speed: entry.wind.speed,
            condition: first_condition(entry.weather),
            formatted: entry.dt_txt,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", query).await?;
        Ok(parsed.into())
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", query).await?;

        Ok(Forecast {
            location_name: parsed.city.name,
            utc_offset_seconds: parsed.city.timezone,
            samples: parsed.list.into_iter().map(IntervalSample::from).collect(),
        })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
