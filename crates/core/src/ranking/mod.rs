pub mod batch;
pub mod provider;
pub mod query;
pub mod report;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::distance::{RankCandidate, RankedHotel, ResolvedDestination};
use crate::errors::DomainError;

use self::{
    batch::{batch_distances, PROVIDER_MAX_BATCH_SIZE},
    provider::{DistanceMatrix, Geocoder},
    report::DistanceReport,
};

pub const DEFAULT_MIN_RATING: f64 = 3.0;
pub const DEFAULT_RANK_LIMIT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankSettings {
    pub max_batch_size: usize,
    pub max_concurrent_requests: usize,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self { max_batch_size: PROVIDER_MAX_BATCH_SIZE, max_concurrent_requests: 4 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankRequest {
    hotels: Vec<RankCandidate>,
    destinations: Vec<String>,
    min_rating: f64,
    limit: usize,
}

impl RankRequest {
    /// Destination names are trimmed and deduplicated in first-seen order.
    /// An empty list is a caller error.
    pub fn new(hotels: Vec<RankCandidate>, destinations: Vec<String>) -> Result<Self, DomainError> {
        let mut unique: Vec<String> = Vec::with_capacity(destinations.len());
        for destination in destinations {
            let destination = destination.trim();
            if !destination.is_empty() && !unique.iter().any(|seen| seen == destination) {
                unique.push(destination.to_string());
            }
        }

        if unique.is_empty() {
            return Err(DomainError::MissingDestinations);
        }

        Ok(Self {
            hotels,
            destinations: unique,
            min_rating: DEFAULT_MIN_RATING,
            limit: DEFAULT_RANK_LIMIT,
        })
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// A limit of zero keeps the default.
    pub fn with_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.limit = limit;
        }
        self
    }

    pub fn hotels(&self) -> &[RankCandidate] {
        &self.hotels
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Ranks hotels by the summed travel distance to a set of destinations.
///
/// Upstream failures never abort a run: unresolvable destinations are
/// dropped, failed distance lookups are carried as `N/A` legs.
pub struct DistanceRanker<G, M> {
    geocoder: G,
    matrix: M,
    settings: RankSettings,
}

impl<G, M> DistanceRanker<G, M>
where
    G: Geocoder,
    M: DistanceMatrix,
{
    pub fn new(geocoder: G, matrix: M, settings: RankSettings) -> Self {
        Self { geocoder, matrix, settings }
    }

    pub async fn rank(&self, request: &RankRequest) -> DistanceReport {
        let eligible: Vec<&RankCandidate> =
            request.hotels.iter().filter(|hotel| hotel.rating() >= request.min_rating).collect();
        if eligible.is_empty() {
            info!(
                event_name = "hotel.rank.no_hotels",
                candidates = request.hotels.len(),
                min_rating = request.min_rating,
                "no hotels meet the rating threshold"
            );
            return DistanceReport::NoMatchingHotels;
        }

        let destinations = self.resolve_destinations(&request.destinations).await;
        if destinations.is_empty() {
            info!(
                event_name = "hotel.rank.no_destinations",
                requested = request.destinations.len(),
                "no destination could be geocoded"
            );
            return DistanceReport::NoValidDestinations;
        }

        let matrix = &self.matrix;
        let destinations = &destinations;
        let max_batch_size = self.settings.max_batch_size;

        // `buffered` keeps input order, so the stable sort below breaks ties
        // by catalog order.
        let mut ranked: Vec<RankedHotel> = stream::iter(eligible.into_iter().cloned())
            .map(|hotel| async move {
                let distances =
                    batch_distances(matrix, hotel.coordinates(), destinations, max_batch_size).await;
                RankedHotel::new(hotel, distances)
            })
            .buffered(self.settings.max_concurrent_requests.max(1))
            .collect()
            .await;

        ranked.sort_by_key(|hotel| hotel.total_distance_meters);
        ranked.truncate(request.limit);

        info!(
            event_name = "hotel.rank.done",
            hotels = ranked.len(),
            destinations = destinations.len(),
            failed_lookups = ranked.iter().map(RankedHotel::failed_lookups).sum::<usize>(),
            "hotel ranking complete"
        );
        DistanceReport::Ranked(ranked)
    }

    /// Geocodes each destination once for this run. Failures are logged and
    /// the destination is left out of every hotel's breakdown.
    pub async fn resolve_destinations(&self, names: &[String]) -> Vec<ResolvedDestination> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            match self.geocoder.resolve(name).await {
                Ok(coordinates) => {
                    resolved.push(ResolvedDestination { name: name.clone(), coordinates })
                }
                Err(error) => warn!(
                    event_name = "hotel.rank.destination_skipped",
                    destination = %name,
                    error = %error,
                    "skipping destination that could not be geocoded"
                ),
            }
        }
        resolved
    }
}
