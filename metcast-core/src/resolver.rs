//! Turns user input (a place name or the device position) into coordinates.

use crate::{
    error::{Result, WeatherError},
    geocode::Geocoder,
    location::{LocationSensor, PositionOptions, locate},
    model::ResolvedPlace,
};

#[derive(Debug)]
pub struct CoordinateResolver {
    geocoder: Box<dyn Geocoder>,
    options: PositionOptions,
}

impl CoordinateResolver {
    pub fn new(geocoder: Box<dyn Geocoder>) -> Self {
        Self { geocoder, options: PositionOptions::default() }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// First geocoding candidate for `place_name`, labelled with the name
    /// as typed. Blank input fails without issuing a request.
    pub async fn resolve_by_name(&self, place_name: &str) -> Result<ResolvedPlace> {
        let place_name = place_name.trim();
        if place_name.is_empty() {
            return Err(WeatherError::GeocodingFailed("Place name is empty".to_string()));
        }

        tracing::debug!(place = place_name, "Geocoding place name");

        let candidate = self
            .geocoder
            .geocode(place_name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::GeocodingFailed(format!("No results found for '{place_name}'")))?;

        tracing::debug!(
            address = %candidate.formatted_address,
            coordinates = %candidate.coordinates,
            "Resolved place name"
        );

        Ok(ResolvedPlace {
            coordinates: candidate.coordinates,
            label: place_name.to_string(),
        })
    }

    /// Device position plus a reverse-geocoded label. A failed reverse
    /// lookup falls back to the coordinates as text.
    pub async fn resolve_by_device(&self, sensor: &dyn LocationSensor) -> Result<ResolvedPlace> {
        let coordinates = locate(sensor, &self.options).await?;

        let label = match self.geocoder.reverse(coordinates).await {
            Ok(Some(label)) => label,
            Ok(None) => {
                tracing::debug!(%coordinates, "No reverse geocoding label, using coordinates");
                coordinates.to_string()
            }
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {e}");
                coordinates.to_string()
            }
        };

        Ok(ResolvedPlace { coordinates, label })
    }
}
