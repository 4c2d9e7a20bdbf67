use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    distance::{DistanceOutcome, LookupFailure},
    hotel::Coordinates,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("geocoding is not configured (missing maps api key)")]
    NotConfigured,
    #[error("could not geocode `{place}`: {status}")]
    NotFound { place: String, status: String },
    #[error("geocoding request failed: {0}")]
    Network(String),
    #[error("geocoding request timed out")]
    Timeout,
    #[error("geocoding response could not be decoded: {0}")]
    Decode(String),
}

impl ResolutionError {
    /// True when the place itself could not be located, as opposed to the
    /// provider being unreachable or misconfigured.
    pub fn is_unresolvable_place(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure of one whole distance sub-call. Every destination in the call
/// inherits it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("distance lookup is not configured (missing maps api key)")]
    NotConfigured,
    #[error("distance matrix rejected the request: {status}")]
    Rejected { status: String, message: Option<String> },
    #[error("distance matrix request failed: {0}")]
    Network(String),
    #[error("distance matrix request timed out")]
    Timeout,
    #[error("distance matrix response could not be decoded: {0}")]
    Decode(String),
}

impl From<&MatrixError> for LookupFailure {
    fn from(error: &MatrixError) -> Self {
        match error {
            MatrixError::NotConfigured => Self::NotConfigured,
            MatrixError::Rejected { status, .. } => Self::from_status(status),
            MatrixError::Network(_) => Self::Network,
            MatrixError::Timeout => Self::Timeout,
            MatrixError::Decode(_) => Self::InvalidResponse,
        }
    }
}

/// Resolves a free-text place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, place: &str) -> Result<Coordinates, ResolutionError>;
}

/// One outbound distance call: a single origin against a group of
/// destinations. Implementations return one outcome per destination, in
/// order; chunking to the provider's batch limit happens in
/// [`batch_distances`](super::batch::batch_distances).
#[async_trait]
pub trait DistanceMatrix: Send + Sync {
    async fn lookup(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<DistanceOutcome>, MatrixError>;
}

#[async_trait]
impl<T: Geocoder + ?Sized> Geocoder for Arc<T> {
    async fn resolve(&self, place: &str) -> Result<Coordinates, ResolutionError> {
        (**self).resolve(place).await
    }
}

#[async_trait]
impl<T: DistanceMatrix + ?Sized> DistanceMatrix for Arc<T> {
    async fn lookup(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<DistanceOutcome>, MatrixError> {
        (**self).lookup(origin, destinations).await
    }
}
