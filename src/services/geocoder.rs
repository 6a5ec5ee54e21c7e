use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;
use crate::database::models::Location;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No location found for {0}")]
    NoMatch(String),

    #[error("Geocoder request failed: {0}")]
    Upstream(String),

    #[error("Geocoder API key is not configured")]
    NotConfigured,
}

/// Resolves free-form addresses and postal codes to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// Upper bound on one geocoder round trip
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// MapQuest address API client
pub struct MapQuestGeocoder {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl MapQuestGeocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: &GeocoderConfig, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            tracing::warn!("Geocoder client without timeout: {}", e);
            Client::new()
        });
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

/// Answers every lookup with the same location. Used when no upstream should be
/// contacted, such as offline runs and tests.
#[derive(Debug, Clone)]
pub struct StaticGeocoder {
    location: Location,
}

impl StaticGeocoder {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Location, GeocodeError> {
        Ok(self.location.clone())
    }
}

impl std::fmt::Debug for MapQuestGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapQuestGeocoder")
            .field("api_url", &self.api_url)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    locations: Vec<GeocodeLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeocodeLocation {
    lat_lng: Option<LatLng>,
    #[serde(default)]
    street: String,
    #[serde(default, rename = "adminArea5")]
    city: String,
    #[serde(default, rename = "adminArea3")]
    state: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default, rename = "adminArea1")]
    country: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl GeocodeLocation {
    fn into_location(self) -> Option<Location> {
        let lat_lng = self.lat_lng?;
        let parts: Vec<&str> = [&self.street, &self.city, &self.state, &self.postal_code, &self.country]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        Some(Location {
            longitude: Some(lat_lng.lng),
            latitude: Some(lat_lng.lat),
            formatted_address: (!parts.is_empty()).then(|| parts.join(", ")),
            city: non_empty(&self.city),
            state: non_empty(&self.state),
            zipcode: non_empty(&self.postal_code),
            country: non_empty(&self.country),
        })
    }
}

/// First location of the first result, if any
fn first_location(body: GeocodeResponse) -> Option<Location> {
    body.results
        .into_iter()
        .next()?
        .locations
        .into_iter()
        .next()?
        .into_location()
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        let key = self.api_key.as_deref().ok_or(GeocodeError::NotConfigured)?;

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("key", key), ("location", address)])
            .send()
            .await
            .map_err(upstream)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Upstream(format!("geocoder answered {}", status)));
        }

        let body: GeocodeResponse = response.json().await.map_err(upstream)?;

        let location = first_location(body).ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;
        tracing::debug!("Geocoded {:?} to {:?}", address, location.formatted_address);
        Ok(location)
    }
}

/// The request URL carries the API key, so it never goes into the message.
fn upstream(err: reqwest::Error) -> GeocodeError {
    GeocodeError::Upstream(err.without_url().to_string())
}
