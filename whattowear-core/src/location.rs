//! Resolving where to look up the weather.
//!
//! A [`LocationSource`] stands in for the device's location capability. The
//! [`LocationResolver`] bounds how long it waits for one and always yields a
//! usable [`LocationQuery`], falling back to a city name on any failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::{Config, FALLBACK_CITY},
    model::{Coordinates, LocationQuery},
};

/// How long to wait for a location fix before using the fallback city.
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

const IP_LOCATION_URL: &str = "http://ip-api.com/json";

/// Why a location fix could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

#[async_trait]
pub trait LocationSource: Send + Sync + std::fmt::Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Coordinates known up front (command-line flags or config).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No location capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl LocationSource for Unavailable {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Approximate location from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocation {
    pub fn new() -> Self {
        Self::with_url(IP_LOCATION_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

impl Default for IpLocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationSource for IpLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?;

        if !res.status().is_success() {
            return Err(LocationError::Other(format!("status {}", res.status())));
        }

        let body: IpApiResponse =
            res.json().await.map_err(|e| LocationError::Other(e.to_string()))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Other(
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            )),
        }
    }
}

/// Turns a location source into a query, never failing.
#[derive(Debug)]
pub struct LocationResolver {
    source: Box<dyn LocationSource>,
    fallback_city: String,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(source: Box<dyn LocationSource>, fallback_city: impl Into<String>) -> Self {
        Self { source, fallback_city: fallback_city.into(), timeout: LOCATION_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a resolver from config: fixed coordinates win, then IP lookup if
    /// enabled, otherwise straight to the fallback city.
    pub fn from_config(config: &Config) -> Self {
        let source: Box<dyn LocationSource> = match config.fixed_coordinates() {
            Some(coords) => Box::new(FixedLocation(coords)),
            None if config.locate => Box::new(IpLocation::new()),
            None => Box::new(Unavailable),
        };

        Self::new(source, config.fallback_city())
    }

    pub async fn resolve(&self) -> LocationQuery {
        let outcome = match tokio::time::timeout(self.timeout, self.source.locate()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        };

        match outcome {
            Ok(coords) => {
                tracing::debug!(lat = coords.latitude, lon = coords.longitude, "location resolved");
                LocationQuery::Coordinates(coords)
            }
            Err(err) => {
                tracing::info!(error = %err, city = %self.fallback_city, "using fallback city");
                LocationQuery::City(self.fallback_city.clone())
            }
        }
    }
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new(Box::new(Unavailable), FALLBACK_CITY)
    }
}
