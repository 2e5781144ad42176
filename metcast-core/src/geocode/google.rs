use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Result, WeatherError},
    http::{build_client, truncate_body},
    model::Coordinates,
};

use super::{Candidate, Geocoder};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Component types tried in order when picking a reverse-lookup label.
const LABEL_PREFERENCE: &[&str] = &[
    "locality",
    "postal_town",
    "administrative_area_level_2",
    "administrative_area_level_1",
    "country",
];

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    base_url: String,
    api_key: String,
    http: Client,
}

impl GoogleGeocoder {
    pub fn new(base_url: &str, api_key: String, user_agent: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            api_key,
            http: build_client(user_agent)?,
        })
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<Vec<GResult>> {
        let res = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::GeocodingFailed(format!("Failed to send request to Google: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::GeocodingFailed(format!("Failed to read Google response body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::GeocodingFailed(format!(
                "Google request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: GResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::GeocodingFailed(format!("Failed to parse Google response JSON: {e}"))
        })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(WeatherError::GeocodingFailed(
                parsed.error_message.unwrap_or_else(|| format!("Google returned status {other}")),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GResponse {
    #[serde(default)]
    results: Vec<GResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GResult {
    #[serde(default)]
    formatted_address: String,
    geometry: Option<GGeometry>,
    #[serde(default)]
    address_components: Vec<GAddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GGeometry {
    location: GLatLng,
}

#[derive(Debug, Deserialize)]
struct GLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GAddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

fn label_from_components(components: &[GAddressComponent]) -> Option<String> {
    LABEL_PREFERENCE.iter().find_map(|wanted| {
        components
            .iter()
            .find(|c| c.types.iter().any(|t| t == wanted))
            .map(|c| c.long_name.clone())
    })
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>> {
        let results = self.request(&[("address", query)]).await?;

        Ok(results
            .into_iter()
            .filter_map(|r| {
                r.geometry.map(|g| Candidate {
                    coordinates: Coordinates::new(g.location.lat, g.location.lng),
                    formatted_address: r.formatted_address,
                })
            })
            .collect())
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>> {
        let latlng = format!("{},{}", coords.latitude, coords.longitude);
        let results = self.request(&[("latlng", latlng.as_str())]).await?;

        Ok(results
            .first()
            .and_then(|r| label_from_components(&r.address_components)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, query_param},
    };

    async fn geocoder(server: &MockServer) -> GoogleGeocoder {
        GoogleGeocoder::new(&server.uri(), "TEST_KEY".into(), "metcast-test").expect("client")
    }

    #[tokio::test]
    async fn geocode_returns_candidates_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("address", "Oslo"))
            .and(query_param("key", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "Oslo, Norway",
                        "geometry": { "location": { "lat": 59.9138688, "lng": 10.7522454 } }
                    },
                    {
                        "formatted_address": "Oslo, MN 56744, USA",
                        "geometry": { "location": { "lat": 48.1952, "lng": -97.1323 } }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let candidates = geocoder(&server).await.geocode("Oslo").await.expect("geocode");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].formatted_address, "Oslo, Norway");
        assert_eq!(candidates[0].coordinates, Coordinates::new(59.9138688, 10.7522454));
    }

    #[tokio::test]
    async fn zero_results_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ZERO_RESULTS",
                "results": []
            })))
            .mount(&server)
            .await;

        let candidates = geocoder(&server).await.geocode("Nowhere").await.expect("geocode");
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn denied_request_carries_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "results": []
            })))
            .mount(&server)
            .await;

        let err = geocoder(&server).await.geocode("Oslo").await.unwrap_err();
        assert_eq!(
            err,
            WeatherError::GeocodingFailed("The provided API key is invalid.".into())
        );
    }

    #[tokio::test]
    async fn reverse_picks_label_by_component_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("latlng", "59.91,10.75"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "Karl Johans gate 1, 0154 Oslo, Norway",
                    "address_components": [
                        { "long_name": "1", "types": ["street_number"] },
                        { "long_name": "Karl Johans gate", "types": ["route"] },
                        { "long_name": "Sentrum", "types": ["sublocality", "political"] },
                        { "long_name": "Oslo", "types": ["postal_town"] },
                        { "long_name": "Norway", "types": ["country", "political"] }
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let label = geocoder(&server)
            .await
            .reverse(Coordinates::new(59.91, 10.75))
            .await
            .expect("reverse");
        assert_eq!(label.as_deref(), Some("Oslo"));
    }

    #[test]
    fn locality_beats_country() {
        let components = vec![
            GAddressComponent { long_name: "Norway".into(), types: vec!["country".into()] },
            GAddressComponent { long_name: "Bergen".into(), types: vec!["locality".into()] },
        ];
        assert_eq!(label_from_components(&components).as_deref(), Some("Bergen"));
        assert_eq!(label_from_components(&[]), None);
    }
}
