use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use tripstay_core::{
    catalog::{Catalog, CatalogError},
    config::{AppConfig, ConfigError},
    ranking::{
        provider::{DistanceMatrix, Geocoder},
        DistanceRanker, RankSettings,
    },
};
use tripstay_maps::{GoogleMapsClient, MapsClientError};

pub type SharedGeocoder = Arc<dyn Geocoder>;
pub type SharedMatrix = Arc<dyn DistanceMatrix>;
pub type SharedRanker = DistanceRanker<SharedGeocoder, SharedMatrix>;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub maps_configured: bool,
    pub geocoder: SharedGeocoder,
    pub ranker: Arc<SharedRanker>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    MapsClient(#[from] MapsClientError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        catalog_path = %config.catalog.path.display(),
        "starting application bootstrap"
    );

    let catalog = Catalog::load(&config.catalog.path)?;

    let client = Arc::new(GoogleMapsClient::from_config(&config.maps)?);
    let maps_configured = client.is_configured();
    if !maps_configured {
        warn!(
            event_name = "system.bootstrap.maps_unconfigured",
            correlation_id = "bootstrap",
            "no maps api key configured; geocoding will fail, so /geocode returns 503 and every distance ranking reports no valid tourist places"
        );
    }

    let settings = RankSettings::from(&config.maps);
    let geocoder: SharedGeocoder = client.clone();
    let matrix: SharedMatrix = client;
    let ranker = DistanceRanker::new(geocoder.clone(), matrix, settings);

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        hotels = catalog.len(),
        maps_configured,
        max_batch_size = settings.max_batch_size,
        max_concurrent_requests = settings.max_concurrent_requests,
        "application bootstrap complete"
    );

    Ok(Application { config, catalog, maps_configured, geocoder, ranker: Arc::new(ranker) })
}
