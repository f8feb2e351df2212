use reqwest::StatusCode;

pub const MSG_GENERIC: &str = "Hava durumu verisi alınamadı. Lütfen manuel olarak şehir arayın.";
pub const MSG_CITY_NOT_FOUND: &str = "Şehir bulunamadı. Lütfen başka bir şehir adı girin.";
pub const MSG_RETRY: &str = "Veri alınamadı. Lütfen tekrar deneyin.";

/// Errors raised while talking to the weather API.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error(
        "No API key configured.\n\
         Hint: run `whattowear configure` or set WHATTOWEAR_API_KEY."
    )]
    MissingApiKey,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API request failed with status {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse weather API response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl WeatherError {
    /// Message shown to the end user in place of the technical error text.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::MissingApiKey => MSG_GENERIC,
            WeatherError::CityNotFound(_) => MSG_CITY_NOT_FOUND,
            WeatherError::Upstream { .. } | WeatherError::Http(_) | WeatherError::Parse(_) => {
                MSG_RETRY
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::CityNotFound(_))
    }
}
