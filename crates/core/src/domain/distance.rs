use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::hotel::{lenient_f64, Coordinates, HotelRecord};
use crate::domain::search::FilteredHotel;

/// Minimal hotel shape the ranker needs. Callers may send any object with
/// these fields; `rating` defaults to 0 when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
}

impl RankCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

impl From<&HotelRecord> for RankCandidate {
    fn from(hotel: &HotelRecord) -> Self {
        Self {
            name: hotel.name.clone(),
            latitude: hotel.coordinates.latitude,
            longitude: hotel.coordinates.longitude,
            rating: Some(hotel.rating),
        }
    }
}

impl From<&FilteredHotel> for RankCandidate {
    fn from(hotel: &FilteredHotel) -> Self {
        Self {
            name: hotel.name.clone(),
            latitude: hotel.latitude,
            longitude: hotel.longitude,
            rating: Some(hotel.rating),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDestination {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leg {
    pub meters: u64,
    pub distance_text: String,
    pub duration_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupFailure {
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    /// Status reported by the provider that has no dedicated variant.
    Upstream(String),
    Network,
    Timeout,
    NotConfigured,
    InvalidResponse,
    MissingElement,
}

impl LookupFailure {
    pub fn from_status(status: &str) -> Self {
        match status {
            "NOT_FOUND" => Self::NotFound,
            "ZERO_RESULTS" => Self::ZeroResults,
            "MAX_ROUTE_LENGTH_EXCEEDED" => Self::MaxRouteLengthExceeded,
            "" => Self::InvalidResponse,
            other => Self::Upstream(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            Self::Upstream(status) => status,
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::MissingElement => "MISSING_ELEMENT",
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistanceOutcome {
    Resolved(Leg),
    Failed(LookupFailure),
}

impl DistanceOutcome {
    pub fn meters(&self) -> Option<u64> {
        match self {
            Self::Resolved(leg) => Some(leg.meters),
            Self::Failed(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationDistance {
    pub destination: String,
    pub outcome: DistanceOutcome,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedHotel {
    pub hotel: RankCandidate,
    pub distances: Vec<DestinationDistance>,
    pub total_distance_meters: u64,
}

impl RankedHotel {
    /// Failed lookups stay in `distances` but add nothing to the total.
    pub fn new(hotel: RankCandidate, distances: Vec<DestinationDistance>) -> Self {
        let total_distance_meters =
            distances.iter().filter_map(|distance| distance.outcome.meters()).sum();
        Self { hotel, distances, total_distance_meters }
    }

    pub fn total_distance_km(&self) -> f64 {
        round_to_hundredths(self.total_distance_meters as f64 / 1000.0)
    }

    pub fn failed_lookups(&self) -> usize {
        self.distances.iter().filter(|distance| !distance.outcome.is_resolved()).count()
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
