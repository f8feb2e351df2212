use crate::{
    forecast::aggregate,
    location::LocationResolver,
    model::LocationQuery,
    provider::WeatherProvider,
    state::{Action, AppState, Failure, RequestId, Snapshot, reduce},
};

/// Drives lookups against a provider and keeps the latest [`AppState`].
#[derive(Debug)]
pub struct Session {
    provider: Box<dyn WeatherProvider>,
    resolver: LocationResolver,
    state: AppState,
    next_request: RequestId,
}

impl Session {
    pub fn new(provider: Box<dyn WeatherProvider>, resolver: LocationResolver) -> Self {
        Self { provider, resolver, state: AppState::default(), next_request: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Resolve the location (falling back to the default city) and look it up.
    pub async fn load_initial(&mut self) -> &AppState {
        let query = self.resolver.resolve().await;
        self.lookup(query).await
    }

    /// Look up a city by name. Blank input is ignored.
    pub async fn search(&mut self, city: &str) -> &AppState {
        let city = city.trim();
        if city.is_empty() {
            return &self.state;
        }
        self.lookup(LocationQuery::City(city.to_string())).await
    }

    /// Fetch current conditions and forecast for `query`.
    ///
    /// A forecast failure after a successful current fetch is logged and the
    /// snapshot is published without forecast data.
    pub async fn lookup(&mut self, query: LocationQuery) -> &AppState {
        self.next_request += 1;
        let request_id = self.next_request;
        self.dispatch(Action::Started { request_id, query: query.clone() });

        let weather = match self.provider.current(&query).await {
            Ok(weather) => weather,
            Err(err) => {
                tracing::error!(error = %err, %query, "current weather request failed");
                self.dispatch(Action::Failed { request_id, failure: Failure::new(&err, &query) });
                return &self.state;
            }
        };

        let forecast = match self.provider.forecast(&query).await {
            Ok(forecast) => Some(forecast),
            Err(err) => {
                tracing::warn!(error = %err, %query, "forecast request failed");
                None
            }
        };

        let daily = forecast
            .as_ref()
            .map(|f| aggregate(&f.samples, &f.offset()))
            .unwrap_or_default();

        self.dispatch(Action::Loaded { request_id, snapshot: Snapshot { weather, forecast, daily } });
        &self.state
    }

    fn dispatch(&mut self, action: Action) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{MSG_CITY_NOT_FOUND, MSG_GENERIC, WeatherError},
        location::{FixedLocation, Unavailable},
        model::{Coordinates, CurrentConditions, Forecast, IntervalSample},
    };
    use async_trait::async_trait;
    use chrono::DateTime;

    #[derive(Debug, Default)]
    struct FakeProvider {
        missing_key: bool,
        forecast_fails: bool,
    }

    fn conditions(name: &str) -> CurrentConditions {
        CurrentConditions {
            location_name: name.to_string(),
            country: None,
            coordinates: None,
            temperature_c: 14.0,
            feels_like_c: 13.0,
            humidity_pct: 70,
            wind_speed: 3.0,
            condition: None,
            sunrise: None,
            sunset: None,
            observed_at: DateTime::from_timestamp(0, 0).unwrap(),
            utc_offset_seconds: 10_800,
        }
    }

    fn sample(timestamp: i64, temp: f64) -> IntervalSample {
        IntervalSample {
            timestamp,
            temperature_c: temp,
            feels_like_c: temp,
            humidity_pct: 50,
            wind_speed: 1.0,
            condition: None,
            formatted: None,
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
            if self.missing_key {
                return Err(WeatherError::MissingApiKey);
            }
            match query {
                LocationQuery::City(name) if name == "Atlantis" => {
                    Err(WeatherError::CityNotFound(name.clone()))
                }
                LocationQuery::City(name) => Ok(conditions(name)),
                LocationQuery::Coordinates(_) => Ok(conditions("Here")),
            }
        }

        async fn forecast(&self, _query: &LocationQuery) -> Result<Forecast, WeatherError> {
            if self.forecast_fails {
                return Err(WeatherError::Upstream {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: String::new(),
                });
            }
            // 2026-10-19T00:00:00Z, three samples over two local (UTC+3) days
            let base = 1_792_368_000;
            Ok(Forecast {
                location_name: "Here".into(),
                utc_offset_seconds: 10_800,
                samples: vec![
                    sample(base, 10.0),
                    sample(base + 10_800, 20.0),
                    sample(base + 86_400, 5.0),
                ],
            })
        }
    }

    fn session(provider: FakeProvider) -> Session {
        Session::new(Box::new(provider), LocationResolver::new(Box::new(Unavailable), "İstanbul"))
    }

    #[tokio::test]
    async fn denied_location_queries_fallback_city_without_error() {
        let mut session = session(FakeProvider::default());

        let state = session.load_initial().await;

        assert!(state.error.is_none());
        assert_eq!(state.query, Some(LocationQuery::City("İstanbul".into())));
        assert_eq!(state.weather().map(|w| w.location_name.as_str()), Some("İstanbul"));
    }

    #[tokio::test]
    async fn located_device_queries_coordinates() {
        let coords = Coordinates::new(41.0, 29.0);
        let mut session = Session::new(
            Box::new(FakeProvider::default()),
            LocationResolver::new(Box::new(FixedLocation(coords)), "İstanbul"),
        );

        let state = session.load_initial().await;
        assert_eq!(state.query, Some(LocationQuery::Coordinates(coords)));
    }

    #[tokio::test]
    async fn lookup_aggregates_forecast_in_location_zone() {
        let mut session = session(FakeProvider::default());
        let state = session.search("Ankara").await;

        let daily = state.daily();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].temperature.mean, 15.0);
        assert_eq!(daily[0].temperature.min, 10.0);
        assert_eq!(daily[0].temperature.max, 20.0);
        assert_eq!(daily[1].temperature.mean, 5.0);
    }

    #[tokio::test]
    async fn unknown_city_clears_previous_weather() {
        let mut session = session(FakeProvider::default());
        session.search("Ankara").await;
        assert!(session.state().weather().is_some());

        let state = session.search("Atlantis").await;
        assert!(state.weather().is_none());
        assert_eq!(state.error, Some(MSG_CITY_NOT_FOUND));
    }

    #[tokio::test]
    async fn forecast_failure_keeps_current_conditions() {
        let mut session = session(FakeProvider { forecast_fails: true, ..Default::default() });
        let state = session.search("Ankara").await;

        assert!(state.error.is_none());
        assert!(state.weather().is_some());
        assert!(state.daily().is_empty());
        assert!(state.snapshot.as_ref().is_some_and(|s| s.forecast.is_none()));
    }

    #[tokio::test]
    async fn missing_key_is_a_generic_failure() {
        let mut session = session(FakeProvider { missing_key: true, ..Default::default() });
        let state = session.search("Ankara").await;

        assert_eq!(state.error, Some(MSG_GENERIC));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn blank_search_is_ignored() {
        let mut session = session(FakeProvider::default());

        let state = session.search("   ").await;
        assert_eq!(state, &AppState::default());
    }

    #[tokio::test]
    async fn each_lookup_gets_a_new_request_id() {
        let mut session = session(FakeProvider::default());
        session.search("Ankara").await;
        session.search("İzmir").await;

        assert_eq!(session.state().request_id, 2);
    }
}
