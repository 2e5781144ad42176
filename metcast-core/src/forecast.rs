//! Forecast fetcher for the met.no `locationforecast` XML feed.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Result, WeatherError},
    http::{build_client, truncate_body},
    model::{
        Coordinates, ForecastDocument, InstantReading, IntervalReading, Reading, TimeEntry,
    },
};

pub const DEFAULT_FORECAST_URL: &str = "https://api.met.no/weatherapi/locationforecast/1.9/";

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// Fetch a fresh document for `coords`. No caching, no retries.
    async fn fetch(&self, coords: Coordinates) -> Result<ForecastDocument>;
}

#[derive(Debug, Clone)]
pub struct MetNoClient {
    base_url: String,
    http: Client,
}

impl MetNoClient {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_client(user_agent)?,
        })
    }
}

#[async_trait]
impl ForecastSource for MetNoClient {
    async fn fetch(&self, coords: Coordinates) -> Result<ForecastDocument> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        tracing::debug!(%lat, %lon, url = %self.base_url, "Fetching forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::FetchFailed(format!("Failed to send forecast request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::FetchFailed(format!("Failed to read forecast body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::FetchFailed(format!(
                "Forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_document(&body)
    }
}

/// Parse a `weatherdata` feed body into a [`ForecastDocument`].
///
/// Entries carrying temperature or wind become instant readings, entries
/// carrying precipitation or a symbol become interval readings; anything
/// else is dropped. Numeric attributes that fail to parse count as absent.
pub fn parse_document(body: &str) -> Result<ForecastDocument> {
    let parsed: XmlWeatherData = serde_xml_rs::from_str(body)
        .map_err(|e| WeatherError::ParseFailed(e.to_string()))?;

    let entries: Vec<TimeEntry> = parsed
        .product
        .times
        .into_iter()
        .filter_map(XmlTime::into_entry)
        .collect();

    tracing::debug!(entries = entries.len(), "Parsed forecast document");
    Ok(ForecastDocument::new(entries))
}

#[derive(Debug, Deserialize)]
struct XmlWeatherData {
    product: XmlProduct,
}

#[derive(Debug, Deserialize)]
struct XmlProduct {
    #[serde(rename = "time", default)]
    times: Vec<XmlTime>,
}

#[derive(Debug, Deserialize)]
struct XmlTime {
    from: String,
    to: String,
    location: Option<XmlLocation>,
}

#[derive(Debug, Deserialize)]
struct XmlLocation {
    temperature: Option<XmlValue>,
    #[serde(rename = "windSpeed")]
    wind_speed: Option<XmlWind>,
    #[serde(rename = "windGust")]
    wind_gust: Option<XmlWind>,
    precipitation: Option<XmlValue>,
    symbol: Option<XmlSymbol>,
}

#[derive(Debug, Deserialize)]
struct XmlValue {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlWind {
    mps: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlSymbol {
    number: Option<String>,
}

fn parse_number<T: std::str::FromStr>(raw: Option<&String>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

impl XmlTime {
    fn into_entry(self) -> Option<TimeEntry> {
        let location = self.location?;

        let reading = if location.temperature.is_some() || location.wind_speed.is_some() {
            Reading::Instant(InstantReading {
                temperature_c: parse_number(location.temperature.as_ref().and_then(|t| t.value.as_ref())),
                wind_speed_mps: parse_number(location.wind_speed.as_ref().and_then(|w| w.mps.as_ref())),
                wind_gust_mps: parse_number(location.wind_gust.as_ref().and_then(|w| w.mps.as_ref())),
                wind_description: location
                    .wind_speed
                    .and_then(|w| w.name)
                    .filter(|name| !name.is_empty()),
            })
        } else if location.precipitation.is_some() || location.symbol.is_some() {
            Reading::Interval(IntervalReading {
                symbol_code: parse_number(location.symbol.as_ref().and_then(|s| s.number.as_ref())),
                precipitation_mm: parse_number(
                    location.precipitation.as_ref().and_then(|p| p.value.as_ref()),
                ),
            })
        } else {
            return None;
        };

        Some(TimeEntry {
            valid_from: self.from,
            valid_to: self.to,
            reading,
        })
    }
}
