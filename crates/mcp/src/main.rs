//! Tripstay MCP Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Catalog and maps key from tripstay.toml / environment
//! GOOGLE_MAPS_API_KEY=... tripstay-mcp
//!
//! # Point at a different catalog
//! TRIPSTAY_CATALOG_PATH=/srv/hotels.json tripstay-mcp
//! ```

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn, Level};
use tripstay_core::{
    catalog::Catalog,
    config::{AppConfig, LoadOptions},
    ranking::{
        provider::{DistanceMatrix, Geocoder},
        DistanceRanker, RankSettings,
    },
};
use tripstay_maps::GoogleMapsClient;
use tripstay_mcp::TripstayMcpServer;

/// stdout carries the protocol, so logs always go to stderr.
fn init_logging(config: &AppConfig) {
    use tripstay_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let catalog = Catalog::load(&config.catalog.path)?;
    let client = Arc::new(GoogleMapsClient::from_config(&config.maps)?);
    if !client.is_configured() {
        warn!(
            event_name = "mcp.bootstrap.maps_unconfigured",
            "no maps api key configured; geocoding will fail and hotel_distances will report no valid tourist places"
        );
    }

    let geocoder: Arc<dyn Geocoder> = client.clone();
    let matrix: Arc<dyn DistanceMatrix> = client;
    let ranker = DistanceRanker::new(geocoder, matrix, RankSettings::from(&config.maps));

    info!(
        event_name = "mcp.bootstrap.ready",
        hotels = catalog.len(),
        "Starting Tripstay MCP Server"
    );
    TripstayMcpServer::new(catalog, Arc::new(ranker)).run_stdio().await
}
