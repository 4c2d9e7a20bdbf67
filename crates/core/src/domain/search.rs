use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::hotel::{lenient_f64, HotelRecord};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid price range `{0}` (expected `min-max`)")]
pub struct PriceRangeError(pub String);

impl PriceRange {
    /// Inclusive on both ends.
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl FromStr for PriceRange {
    type Err = PriceRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bounds: Vec<&str> = value.split('-').collect();
        let [min, max] = bounds.as_slice() else {
            return Err(PriceRangeError(value.to_string()));
        };

        let parse = |bound: &str| {
            bound.trim().parse::<f64>().map_err(|_| PriceRangeError(value.to_string()))
        };
        Ok(Self { min: parse(*min)?, max: parse(*max)? })
    }
}

/// Request-scoped filter predicate. Every criterion is optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub room_query: Option<String>,
    pub price_range: Option<PriceRange>,
    pub min_rating: Option<f64>,
    pub required_facilities: Vec<String>,
}

impl FilterCriteria {
    pub fn with_room_query(mut self, room_query: impl Into<String>) -> Self {
        self.room_query = normalize_room_query(Some(room_query.into()));
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange { min, max });
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.required_facilities.push(facility.into());
        self
    }
}

/// Wire shape of a filter request as sent by agents and HTTP callers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub room_query: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub required_facilities: Option<Vec<String>>,
}

impl FilterQuery {
    /// Malformed price ranges are logged and dropped rather than rejected.
    pub fn into_criteria(self) -> FilterCriteria {
        let price_range = self
            .price_range
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match raw.parse::<PriceRange>() {
                Ok(range) => Some(range),
                Err(error) => {
                    warn!(
                        event_name = "hotel.filter.invalid_price_range",
                        price_range = %raw,
                        error = %error,
                        "ignoring price range filter"
                    );
                    None
                }
            });

        FilterCriteria {
            room_query: normalize_room_query(self.room_query),
            price_range,
            min_rating: self.min_rating,
            required_facilities: self
                .required_facilities
                .unwrap_or_default()
                .into_iter()
                .map(|facility| facility.trim().to_string())
                .filter(|facility| !facility.is_empty())
                .collect(),
        }
    }
}

fn normalize_room_query(room_query: Option<String>) -> Option<String> {
    room_query.map(|query| query.trim().to_string()).filter(|query| !query.is_empty())
}

/// A hotel's display fields plus only the room/price pairs that matched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilteredHotel {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    #[serde(rename = "rooms")]
    pub matching_rooms: Vec<String>,
    #[serde(rename = "prices")]
    pub matching_prices: Vec<f64>,
    pub checkin: String,
    pub checkout: String,
    pub facilities: Vec<String>,
}

impl FilteredHotel {
    pub fn from_matches(
        hotel: &HotelRecord,
        matching_rooms: Vec<String>,
        matching_prices: Vec<f64>,
    ) -> Self {
        Self {
            name: hotel.name.clone(),
            address: hotel.address.clone(),
            latitude: hotel.coordinates.latitude,
            longitude: hotel.coordinates.longitude,
            rating: hotel.rating,
            matching_rooms,
            matching_prices,
            checkin: hotel.checkin.clone(),
            checkout: hotel.checkout.clone(),
            facilities: hotel.facilities.clone(),
        }
    }
}
