//! Google Maps adapter for the ranking collaborators: geocoding of free-text
//! place names and one-origin distance matrix lookups.

pub mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use tripstay_core::config::MapsConfig;
use tripstay_core::domain::{distance::DistanceOutcome, hotel::Coordinates};
use tripstay_core::ranking::provider::{DistanceMatrix, Geocoder, MatrixError, ResolutionError};

use crate::wire::{DistanceMatrixResponse, GeocodeResponse, STATUS_OK};

#[derive(Debug, Error)]
pub enum MapsClientError {
    #[error("could not build maps http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Failure of a single HTTP exchange, before it is mapped onto the
/// geocoding or distance error of the calling operation.
#[derive(Debug)]
enum TransportError {
    Timeout,
    Network(String),
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

#[derive(Clone, Debug)]
pub struct GoogleMapsClient {
    http: Client,
    api_key: Option<SecretString>,
    geocode_url: String,
    distance_matrix_url: String,
}

impl GoogleMapsClient {
    pub fn from_config(config: &MapsConfig) -> Result<Self, MapsClientError> {
        let http = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        let api_key = config.has_api_key().then(|| config.api_key.clone()).flatten();

        Ok(Self {
            http,
            api_key,
            geocode_url: config.geocode_url.clone(),
            distance_matrix_url: config.distance_matrix_url.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let response = self.http.get(url).query(query).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn resolve(&self, place: &str) -> Result<Coordinates, ResolutionError> {
        let Some(api_key) = &self.api_key else {
            return Err(ResolutionError::NotConfigured);
        };

        let response: GeocodeResponse = self
            .get_json(&self.geocode_url, &[("address", place), ("key", api_key.expose_secret())])
            .await
            .map_err(|error| match error {
                TransportError::Timeout => ResolutionError::Timeout,
                TransportError::Network(message) => ResolutionError::Network(message),
                TransportError::Decode(message) => ResolutionError::Decode(message),
            })?;

        match response.first_location() {
            Some(coordinates) => {
                debug!(
                    event_name = "maps.geocode.resolved",
                    place = %place,
                    coordinates = %coordinates,
                    "place geocoded"
                );
                Ok(coordinates)
            }
            None => {
                let status = if response.status == STATUS_OK {
                    "ZERO_RESULTS".to_string()
                } else {
                    response.status
                };
                warn!(
                    event_name = "maps.geocode.not_found",
                    place = %place,
                    status = %status,
                    provider_message = response.error_message.as_deref().unwrap_or(""),
                    "geocoding returned no location"
                );
                Err(ResolutionError::NotFound { place: place.to_string(), status })
            }
        }
    }
}

#[async_trait]
impl DistanceMatrix for GoogleMapsClient {
    async fn lookup(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<DistanceOutcome>, MatrixError> {
        let Some(api_key) = &self.api_key else {
            return Err(MatrixError::NotConfigured);
        };
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let origins = origin.to_string();
        let destinations_param =
            destinations.iter().map(Coordinates::to_string).collect::<Vec<_>>().join("|");

        let response: DistanceMatrixResponse = self
            .get_json(
                &self.distance_matrix_url,
                &[
                    ("origins", origins.as_str()),
                    ("destinations", destinations_param.as_str()),
                    ("key", api_key.expose_secret()),
                ],
            )
            .await
            .map_err(|error| match error {
                TransportError::Timeout => MatrixError::Timeout,
                TransportError::Network(message) => MatrixError::Network(message),
                TransportError::Decode(message) => MatrixError::Decode(message),
            })?;

        if response.status != STATUS_OK {
            return Err(MatrixError::Rejected {
                status: response.status,
                message: response.error_message,
            });
        }

        let outcomes = response.into_outcomes();
        debug!(
            event_name = "maps.distance.batch_done",
            origin = %origin,
            requested = destinations.len(),
            returned = outcomes.len(),
            "distance matrix batch answered"
        );
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use tripstay_core::config::AppConfig;
    use tripstay_core::domain::hotel::Coordinates;
    use tripstay_core::ranking::provider::{DistanceMatrix, Geocoder, MatrixError, ResolutionError};

    use super::GoogleMapsClient;

    fn unconfigured() -> GoogleMapsClient {
        let mut maps = AppConfig::default().maps;
        // Unroutable, so a stray request would fail loudly instead of succeeding.
        maps.geocode_url = "http://127.0.0.1:9/geocode/json".to_string();
        maps.distance_matrix_url = "http://127.0.0.1:9/distancematrix/json".to_string();
        GoogleMapsClient::from_config(&maps).expect("client")
    }

    #[tokio::test]
    async fn missing_key_short_circuits_geocoding() {
        let client = unconfigured();
        assert!(!client.is_configured());
        assert_eq!(client.resolve("India Gate").await, Err(ResolutionError::NotConfigured));
    }

    #[tokio::test]
    async fn missing_key_short_circuits_distance_lookup() {
        let client = unconfigured();
        let result = client.lookup(Coordinates::new(0.0, 0.0), &[Coordinates::new(1.0, 1.0)]).await;
        assert_eq!(result, Err(MatrixError::NotConfigured));
    }

    #[test]
    fn blank_key_counts_as_unconfigured() {
        let mut maps = AppConfig::default().maps;
        maps.api_key = Some("   ".to_string().into());
        let client = GoogleMapsClient::from_config(&maps).expect("client");
        assert!(!client.is_configured());
    }
}
