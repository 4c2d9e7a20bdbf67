use serde::Deserialize;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::domain::{distance::RankCandidate, search::FilterQuery};
use crate::errors::DomainError;
use crate::ranking::{RankRequest, DEFAULT_MIN_RATING};

/// Wire shape of a distance request. Without `hotels` the filter runs over
/// the catalog first with the same criteria.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DistanceQuery {
    #[serde(default)]
    pub tourist_places: Vec<String>,
    #[serde(default)]
    pub hotels: Option<Value>,
    #[serde(flatten)]
    pub filter: FilterQuery,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl DistanceQuery {
    /// The catalog filter sees the same rating threshold as the ranker, so
    /// the capped filter output is never filled with hotels the ranker drops.
    pub fn into_request(self, catalog: &Catalog) -> Result<RankRequest, DomainError> {
        if self.tourist_places.iter().all(|place| place.trim().is_empty()) {
            return Err(DomainError::MissingDestinations);
        }

        let min_rating =
            self.filter.min_rating.filter(|rating| *rating > 0.0).unwrap_or(DEFAULT_MIN_RATING);
        let hotels = match self.hotels {
            Some(value) => parse_hotels(value)?,
            None => {
                let criteria =
                    FilterQuery { min_rating: Some(min_rating), ..self.filter }.into_criteria();
                catalog.search(&criteria).iter().map(RankCandidate::from).collect()
            }
        };

        Ok(RankRequest::new(hotels, self.tourist_places)?
            .with_min_rating(min_rating)
            .with_limit(self.limit.unwrap_or_default()))
    }
}

/// Accepts a JSON array of hotel-shaped objects, or the same array encoded
/// as a string (agents often forward tool output verbatim).
pub fn parse_hotels(value: Value) -> Result<Vec<RankCandidate>, DomainError> {
    let value = match value {
        Value::String(raw) => serde_json::from_str::<Value>(&raw).map_err(|_| {
            DomainError::InvalidHotels("hotels string is not valid JSON".to_string())
        })?,
        other => other,
    };

    let Value::Array(items) = value else {
        return Err(DomainError::InvalidHotels("hotels must be an array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RankCandidate>(item).map_err(|error| {
                DomainError::InvalidHotels(format!("hotel #{index} is not a hotel record: {error}"))
            })
        })
        .collect()
}
