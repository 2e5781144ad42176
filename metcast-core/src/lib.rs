//! Core library for the `metcast` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding and device-location resolution
//! - Fetching and parsing the met.no location forecast
//! - Extracting current conditions and a 3-day strip from a forecast
//! - Event-driven session state for front ends
//!
//! It is used by `metcast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod extract;
pub mod forecast;
pub mod geocode;
mod http;
pub mod location;
pub mod lookup;
pub mod model;
pub mod resolver;
pub mod session;
pub mod symbols;
pub mod units;

pub use config::{Config, GeocoderConfig, IconConfig};
pub use error::WeatherError;
pub use forecast::{ForecastSource, MetNoClient};
pub use geocode::{Geocoder, GeocoderId};
pub use location::{FixedSensor, LocationSensor, PositionOptions, UnavailableSensor};
pub use lookup::{SearchQuery, WeatherLookup};
pub use model::{
    Coordinates, CurrentConditions, DaySummary, ForecastDocument, ForecastReport, HourOfDay,
    ResolvedPlace,
};
pub use session::{Event, Session, SessionState};
pub use units::{TemperatureUnit, to_fahrenheit};
