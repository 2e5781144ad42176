//! Device location sensors.
//!
//! Sensors report errors with the same numeric codes browsers use for
//! geolocation so the logged warning reads `ERROR(<code>): <message>`.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;

use crate::{
    error::{Result, WeatherError},
    model::Coordinates,
};

/// Options passed to a sensor for a single fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the sensor may return; zero forces a fresh reading.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl PositionError {
    pub fn new(code: PositionErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<PositionError> for WeatherError {
    fn from(err: PositionError) -> Self {
        WeatherError::LocationUnavailable { code: err.code as u16, message: err.message }
    }
}

#[async_trait]
pub trait LocationSensor: Send + Sync + Debug {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError>;
}

/// Sensor that always reports the same position, e.g. coordinates given on
/// the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedSensor(pub Coordinates);

#[async_trait]
impl LocationSensor for FixedSensor {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError> {
        Ok(self.0)
    }
}

/// Sensor for hosts without a location service.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSensor;

#[async_trait]
impl LocationSensor for UnavailableSensor {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> std::result::Result<Coordinates, PositionError> {
        Err(PositionError::new(
            PositionErrorCode::PositionUnavailable,
            "Location service unavailable",
        ))
    }
}

/// Read one fix from `sensor`, bounded by `options.timeout`.
///
/// Failures are logged here and returned as `LocationUnavailable`; callers
/// carry on with whatever state they already had.
pub async fn locate(sensor: &dyn LocationSensor, options: &PositionOptions) -> Result<Coordinates> {
    let outcome = match tokio::time::timeout(options.timeout, sensor.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(PositionError::new(PositionErrorCode::Timeout, "Timeout expired")),
    };

    outcome.map_err(|err| {
        let err = WeatherError::from(err);
        tracing::warn!("{err}");
        err
    })
}
