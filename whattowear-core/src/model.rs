use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// What to ask the weather API for: a point, or a free-text city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationQuery {
    Coordinates(Coordinates),
    City(String),
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::Coordinates(c) => write!(f, "{:.4}, {:.4}", c.latitude, c.longitude),
            LocationQuery::City(name) => f.write_str(name),
        }
    }
}

/// Short condition code (e.g. "10d") plus localized description text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub icon: String,
    pub description: String,
}

/// One 3-hour forecast data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSample {
    /// Epoch seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    /// Unit as returned by the API (m/s for metric requests).
    pub wind_speed: f64,
    pub condition: Option<Condition>,
    /// Upstream UTC timestamp text, e.g. "2026-10-19 12:00:00".
    ///
    /// Passed through to `show --json` only. Grouping and display work from
    /// `timestamp` in an explicit zone, never from this string.
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    /// Arithmetic mean rounded to the nearest integer.
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Aggregated statistics for all samples sharing a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub day_key: NaiveDate,
    /// Start of `day_key` in the aggregation time zone, epoch seconds.
    pub day_epoch: i64,
    pub temperature: TemperatureStats,
    pub feels_like_mean: f64,
    pub humidity_mean: f64,
    pub wind_speed_mean: f64,
    /// Condition of the first sample of the day.
    pub condition: Option<Condition>,
}

/// Current conditions for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition: Option<Condition>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub observed_at: DateTime<Utc>,
    /// Shift in seconds from UTC for the location.
    pub utc_offset_seconds: i32,
}

impl CurrentConditions {
    /// Fixed offset of the location, falling back to UTC for out-of-range values.
    pub fn offset(&self) -> FixedOffset {
        offset_or_utc(self.utc_offset_seconds)
    }
}

/// Raw 3-hour forecast list for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Name the forecast endpoint reports; headed over the daily table.
    pub location_name: String,
    pub utc_offset_seconds: i32,
    pub samples: Vec<IntervalSample>,
}

impl Forecast {
    pub fn offset(&self) -> FixedOffset {
        offset_or_utc(self.utc_offset_seconds)
    }
}

pub(crate) fn offset_or_utc(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}
