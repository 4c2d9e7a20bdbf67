pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod ranking;

pub use catalog::{Catalog, CatalogError};
pub use domain::distance::{
    DestinationDistance, DistanceOutcome, Leg, LookupFailure, RankCandidate, RankedHotel,
};
pub use domain::hotel::{Coordinates, HotelRecord};
pub use domain::search::{FilterCriteria, FilterQuery, FilteredHotel, PriceRange};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use filter::{filter_hotels, MAX_FILTER_RESULTS};
pub use ranking::{
    provider::{DistanceMatrix, Geocoder, MatrixError, ResolutionError},
    query::DistanceQuery,
    report::DistanceReport,
    DistanceRanker, RankRequest, RankSettings,
};
