use thiserror::Error;

/// Failures surfaced by the lookup pipeline.
///
/// None of these are fatal: callers convert them into an inline message,
/// a logged warning or the empty forecast state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// Name resolution returned no candidates or the geocoder errored.
    #[error("Geocoding failed: {0}")]
    GeocodingFailed(String),

    /// Device location denied, timed out or unsupported.
    #[error("ERROR({code}): {message}")]
    LocationUnavailable { code: u16, message: String },

    /// Transport error or non-success status from the forecast endpoint.
    #[error("Forecast request failed: {0}")]
    FetchFailed(String),

    /// Forecast body did not match the expected document structure.
    #[error("Failed to parse forecast document: {0}")]
    ParseFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Whether the failure belongs on the "no data" path rather than being
    /// shown as an inline message.
    pub fn is_forecast_failure(&self) -> bool {
        matches!(self, WeatherError::FetchFailed(_) | WeatherError::ParseFailed(_))
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
