//! Tripstay MCP (Model Context Protocol) Server
//!
//! Exposes the hotel filter and the distance ranker as MCP tools so trip
//! planning agents can call them over stdio.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tripstay_core::catalog::Catalog;
//! use tripstay_core::config::AppConfig;
//! use tripstay_core::ranking::{provider::{DistanceMatrix, Geocoder}, DistanceRanker, RankSettings};
//! use tripstay_maps::GoogleMapsClient;
//! use tripstay_mcp::TripstayMcpServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let client = Arc::new(GoogleMapsClient::from_config(&config.maps)?);
//!     let geocoder: Arc<dyn Geocoder> = client.clone();
//!     let matrix: Arc<dyn DistanceMatrix> = client;
//!     let ranker = DistanceRanker::new(geocoder, matrix, RankSettings::default());
//!     TripstayMcpServer::new(Catalog::default(), Arc::new(ranker)).run_stdio().await
//! }
//! ```

mod server;
mod tools;

pub use server::{DistanceToolInput, FilterToolInput, SharedRanker, TripstayMcpServer};
pub use tools::{ALL_TOOL_NAMES, FILTER_HOTELS, HOTEL_DISTANCES};

use rmcp::model::ErrorData;
use thiserror::Error;
use tripstay_core::errors::DomainError;

/// Errors specific to MCP server operations
#[derive(Error, Debug)]
pub enum McpError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::Validation(_) => -32602, // Invalid params
            McpError::Internal(_) => -32603,   // Internal error
        }
    }

    pub fn into_error_data(self) -> ErrorData {
        match self {
            McpError::Validation(message) => ErrorData::invalid_params(message, None),
            McpError::Internal(message) => ErrorData::internal_error(message, None),
        }
    }
}

impl From<DomainError> for McpError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}
