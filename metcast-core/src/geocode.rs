use crate::{
    Config,
    error::Result,
    geocode::{google::GoogleGeocoder, nominatim::NominatimGeocoder},
    model::Coordinates,
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod google;
pub mod nominatim;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocoderId {
    Google,
    Nominatim,
}

impl GeocoderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocoderId::Google => "google",
            GeocoderId::Nominatim => "nominatim",
        }
    }

    pub const fn all() -> &'static [GeocoderId] {
        &[GeocoderId::Google, GeocoderId::Nominatim]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, GeocoderId::Google)
    }
}

impl std::fmt::Display for GeocoderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GeocoderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "google" => Ok(GeocoderId::Google),
            "nominatim" => Ok(GeocoderId::Nominatim),
            _ => Err(anyhow::anyhow!(
                "Unknown geocoder '{value}'. Supported geocoders: google, nominatim."
            )),
        }
    }
}

/// A forward-geocoding hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub coordinates: Coordinates,
    pub formatted_address: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidates for a free-text place name, best match first.
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>>;

    /// Display label for coordinates, `None` when nothing suitable was found.
    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>>;
}

/// Construct a geocoder from config and explicit GeocoderId.
pub fn geocoder_from_config(id: GeocoderId, config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    let user_agent = config.user_agent();

    let boxed: Box<dyn Geocoder> = match id {
        GeocoderId::Google => {
            let api_key = config.geocoder_api_key(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for geocoder '{id}'.\n\
                     Hint: run `metcast configure {id}` and enter your API key."
                )
            })?;
            Box::new(GoogleGeocoder::new(
                config.geocoder_base_url(id).unwrap_or(google::DEFAULT_BASE_URL),
                api_key.to_owned(),
                user_agent,
            )?)
        }
        GeocoderId::Nominatim => Box::new(NominatimGeocoder::new(
            config.geocoder_base_url(id).unwrap_or(nominatim::DEFAULT_BASE_URL),
            user_agent,
        )?),
    };

    Ok(boxed)
}

/// Construct the default geocoder from config, using `default_geocoder` field.
pub fn default_geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    let id = config.default_geocoder_id()?;
    geocoder_from_config(id, config)
}
