//! OpenStreetMap Nominatim geocoder. Free, no API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{Result, WeatherError},
    http::{build_client, truncate_body},
    model::Coordinates,
};

use super::{Candidate, Geocoder};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// First non-empty component, most specific first.
    fn label(self) -> Option<String> {
        [
            self.city,
            self.town,
            self.village,
            self.municipality,
            self.county,
            self.state,
            self.country,
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
    }
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client(user_agent)?,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| WeatherError::GeocodingFailed(format!("Failed to send request to Nominatim: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::GeocodingFailed(format!("Failed to read Nominatim response body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::GeocodingFailed(format!(
                "Nominatim request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::GeocodingFailed(format!("Failed to parse Nominatim response JSON: {e}"))
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>> {
        let places: Vec<NominatimPlace> = self.get("search", &[("q", query), ("limit", "5")]).await?;

        Ok(places
            .into_iter()
            .filter_map(|p| {
                let latitude = p.lat.parse().ok()?;
                let longitude = p.lon.parse().ok()?;
                Some(Candidate {
                    coordinates: Coordinates::new(latitude, longitude),
                    formatted_address: p.display_name,
                })
            })
            .collect())
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let body: NominatimReverse = self
            .get(
                "reverse",
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("addressdetails", "1"), ("zoom", "10")],
            )
            .await?;

        Ok(body.address.and_then(NominatimAddress::label))
    }
}
