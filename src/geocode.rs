//! Free-text birth place resolution.
//!
//! The pipeline only needs one capability: place text in, coordinates out.
//! `NominatimGeocoder` is the production implementation; tests substitute a
//! fixed stub through the `Geocoder` trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::error::AstrologyError;

const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("synastr_core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-text place name to coordinates.
    ///
    /// Fails with `LocationNotFound` when the text matches nothing (user
    /// input, not retryable) and `GeocodingService` when the lookup service
    /// is unreachable or answers garbage (retryable).
    async fn resolve(&self, place: &str) -> Result<GeoPoint, AstrologyError>;
}

/// Geocoder backed by the public Nominatim search endpoint.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

// Nominatim serialises coordinates as JSON strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_BASE_URL)
    }

    /// Overridable endpoint, for self-hosted instances.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        NominatimGeocoder {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn service_error(
        place: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> AstrologyError {
        AstrologyError::GeocodingService {
            place: place.to_string(),
            source: Box::new(source),
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, place: &str) -> Result<GeoPoint, AstrologyError> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            encode(place)
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| Self::service_error(place, e))?
            .error_for_status()
            .map_err(|e| Self::service_error(place, e))?;

        let results: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| Self::service_error(place, e))?;

        let hit = results.into_iter().next().ok_or_else(|| {
            AstrologyError::LocationNotFound {
                place: place.to_string(),
            }
        })?;

        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|e| Self::service_error(place, e))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|e| Self::service_error(place, e))?;

        log::debug!("geocoded {:?} -> ({}, {})", place, latitude, longitude);
        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_payload_shape() {
        let body = r#"[{"lat": "4.6533816", "lon": "-74.0836333", "display_name": "Bogotá"}]"#;
        let parsed: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].lat, "4.6533816");
        assert_eq!(parsed[0].lon, "-74.0836333");
    }

    #[test]
    fn empty_payload_means_not_found() {
        let parsed: Vec<NominatimPlace> = serde_json::from_str("[]").unwrap();
        assert!(parsed.is_empty());
    }
}
