//! Response shapes of the Google Geocoding and Distance Matrix JSON APIs.
//! Only the fields the ranker reads are modelled.

use serde::Deserialize;

use tripstay_core::domain::{
    distance::{DistanceOutcome, Leg, LookupFailure},
    hotel::Coordinates,
};

pub const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponse {
    /// First result's location, when the provider answered `OK`.
    pub fn first_location(&self) -> Option<Coordinates> {
        if self.status != STATUS_OK {
            return None;
        }
        self.results
            .first()
            .map(|result| Coordinates::new(result.geometry.location.lat, result.geometry.location.lng))
    }
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    #[serde(default)]
    pub status: String,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

impl MatrixElement {
    pub fn into_outcome(self) -> DistanceOutcome {
        if self.status != STATUS_OK {
            return DistanceOutcome::Failed(LookupFailure::from_status(&self.status));
        }
        match (self.distance, self.duration) {
            (Some(distance), Some(duration)) => DistanceOutcome::Resolved(Leg {
                meters: distance.value,
                distance_text: distance.text,
                duration_text: duration.text,
            }),
            _ => DistanceOutcome::Failed(LookupFailure::InvalidResponse),
        }
    }
}

impl DistanceMatrixResponse {
    /// Outcomes for the single origin row, in destination order. The caller
    /// pads anything the provider left out.
    pub fn into_outcomes(self) -> Vec<DistanceOutcome> {
        self.rows
            .into_iter()
            .next()
            .map(|row| row.elements.into_iter().map(MatrixElement::into_outcome).collect())
            .unwrap_or_default()
    }
}
