use tracing::warn;

use crate::domain::{
    distance::{DestinationDistance, DistanceOutcome, LookupFailure, ResolvedDestination},
    hotel::Coordinates,
};
use crate::ranking::provider::DistanceMatrix;

/// Largest destination group the Distance Matrix API accepts per request.
pub const PROVIDER_MAX_BATCH_SIZE: usize = 25;

/// Distances from `origin` to every destination, issued as sequential
/// sub-calls of at most `max_batch_size` destinations each.
///
/// Results come back in destination order. A failed sub-call marks only its
/// own destinations as failed; destinations the provider left out of its
/// answer are marked [`LookupFailure::MissingElement`].
pub async fn batch_distances<M>(
    matrix: &M,
    origin: Coordinates,
    destinations: &[ResolvedDestination],
    max_batch_size: usize,
) -> Vec<DestinationDistance>
where
    M: DistanceMatrix + ?Sized,
{
    let mut results = Vec::with_capacity(destinations.len());

    for group in destinations.chunks(max_batch_size.max(1)) {
        let coordinates: Vec<Coordinates> =
            group.iter().map(|destination| destination.coordinates).collect();

        match matrix.lookup(origin, &coordinates).await {
            Ok(outcomes) => {
                let mut outcomes = outcomes.into_iter();
                for destination in group {
                    let outcome = outcomes
                        .next()
                        .unwrap_or(DistanceOutcome::Failed(LookupFailure::MissingElement));
                    results.push(DestinationDistance {
                        destination: destination.name.clone(),
                        outcome,
                    });
                }
            }
            Err(error) => {
                warn!(
                    event_name = "hotel.distance.batch_failed",
                    origin = %origin,
                    destinations = group.len(),
                    error = %error,
                    "distance batch failed; marking its destinations unavailable"
                );
                let failure = LookupFailure::from(&error);
                results.extend(group.iter().map(|destination| DestinationDistance {
                    destination: destination.name.clone(),
                    outcome: DistanceOutcome::Failed(failure.clone()),
                }));
            }
        }
    }

    results
}
