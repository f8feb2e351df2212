//! Immutable view state and the reducer that evolves it.
//!
//! Every lookup is tagged with a request id. Completions carrying an id other
//! than the latest one are dropped, so a slow response can never overwrite a
//! newer result.

use serde::Serialize;

use crate::{
    error::{MSG_GENERIC, WeatherError},
    model::{CurrentConditions, DailySummary, Forecast, LocationQuery},
};

pub type RequestId = u64;

/// Result of one successful lookup, replacing any previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub weather: CurrentConditions,
    /// `None` when the forecast request failed.
    pub forecast: Option<Forecast>,
    pub daily: Vec<DailySummary>,
}

/// User-facing failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: &'static str,
    /// Drop the previously shown weather.
    pub clear_weather: bool,
}

impl Failure {
    /// Failure for `err` raised while looking up `query`.
    ///
    /// Any failure of a coordinate lookup gets the generic message and keeps
    /// the weather on screen; only a city search can clear it.
    pub fn new(err: &WeatherError, query: &LocationQuery) -> Self {
        match query {
            LocationQuery::Coordinates(_) => Failure { message: MSG_GENERIC, clear_weather: false },
            LocationQuery::City(_) => {
                Failure { message: err.user_message(), clear_weather: err.is_not_found() }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AppState {
    pub request_id: RequestId,
    pub loading: bool,
    pub query: Option<LocationQuery>,
    pub snapshot: Option<Snapshot>,
    pub error: Option<&'static str>,
}

impl AppState {
    pub fn weather(&self) -> Option<&CurrentConditions> {
        self.snapshot.as_ref().map(|s| &s.weather)
    }

    pub fn daily(&self) -> &[DailySummary] {
        self.snapshot.as_ref().map(|s| s.daily.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Started { request_id: RequestId, query: LocationQuery },
    Loaded { request_id: RequestId, snapshot: Snapshot },
    Failed { request_id: RequestId, failure: Failure },
}

impl Action {
    fn request_id(&self) -> RequestId {
        match self {
            Action::Started { request_id, .. }
            | Action::Loaded { request_id, .. }
            | Action::Failed { request_id, .. } => *request_id,
        }
    }
}

pub fn reduce(state: AppState, action: Action) -> AppState {
    if !matches!(action, Action::Started { .. }) && action.request_id() != state.request_id {
        tracing::debug!(
            stale = action.request_id(),
            latest = state.request_id,
            "discarding stale response"
        );
        return state;
    }

    match action {
        Action::Started { request_id, query } => AppState {
            request_id,
            loading: true,
            query: Some(query),
            error: None,
            ..state
        },
        Action::Loaded { request_id, snapshot } => AppState {
            request_id,
            loading: false,
            query: state.query,
            snapshot: Some(snapshot),
            error: None,
        },
        Action::Failed { request_id, failure } => AppState {
            request_id,
            loading: false,
            snapshot: if failure.clear_weather { None } else { state.snapshot },
            error: Some(failure.message),
            query: state.query,
        },
    }
}
