//! MCP Server Implementation
//!
//! Implements the Model Context Protocol server for Tripstay.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ErrorData, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
    ServerHandler, ServiceExt,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use tripstay_core::{
    catalog::Catalog,
    domain::search::FilterQuery,
    ranking::{
        provider::{DistanceMatrix, Geocoder},
        query::DistanceQuery,
        DistanceRanker,
    },
};

use crate::McpError;

pub type SharedRanker = DistanceRanker<Arc<dyn Geocoder>, Arc<dyn DistanceMatrix>>;

/// Main MCP server for Tripstay
#[derive(Clone)]
pub struct TripstayMcpServer {
    catalog: Catalog,
    ranker: Arc<SharedRanker>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool inputs
// ============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct FilterToolInput {
    #[schemars(description = "Room category to match, e.g. \"Deluxe\" or \"Standard\"")]
    #[serde(default)]
    pub room_query: Option<String>,

    #[schemars(description = "Inclusive price range per night as \"min-max\", e.g. \"1000-2500\"")]
    #[serde(default)]
    pub price_range: Option<String>,

    #[schemars(description = "Minimum hotel rating")]
    #[serde(default)]
    pub min_rating: Option<f64>,

    #[schemars(description = "Facilities every hotel must offer, e.g. [\"WiFi\", \"Pool\"]")]
    #[serde(default)]
    pub required_facilities: Option<Vec<String>>,
}

impl From<FilterToolInput> for FilterQuery {
    fn from(input: FilterToolInput) -> Self {
        Self {
            room_query: input.room_query,
            price_range: input.price_range,
            min_rating: input.min_rating,
            required_facilities: input.required_facilities,
        }
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct DistanceToolInput {
    #[schemars(description = "Tourist places to measure from each hotel")]
    #[serde(default)]
    pub tourist_places: Vec<String>,

    #[schemars(
        description = "Hotels to rank, usually the output of filter_hotels. When omitted the catalog is filtered with the criteria below."
    )]
    #[serde(default)]
    pub hotels: Option<Value>,

    #[serde(flatten)]
    pub filter: FilterToolInput,

    #[schemars(description = "Maximum number of hotels to return (default 10)")]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<DistanceToolInput> for DistanceQuery {
    fn from(input: DistanceToolInput) -> Self {
        Self {
            tourist_places: input.tourist_places,
            hotels: input.hotels,
            filter: input.filter.into(),
            limit: input.limit,
        }
    }
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl TripstayMcpServer {
    pub fn new(catalog: Catalog, ranker: Arc<SharedRanker>) -> Self {
        Self { catalog, ranker, tool_router: Self::tool_router() }
    }

    /// Run the server with stdio transport
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        info!(event_name = "mcp.server.start", transport = "stdio", "starting MCP server");

        let service = self.serve(stdio()).await?;
        service.waiting().await?;

        info!(event_name = "mcp.server.stopped", "MCP server shutdown complete");
        Ok(())
    }

    #[tool(
        description = "Filter the hotel catalog by room category, price range, minimum rating and required facilities. Returns up to 10 hotels as JSON with only the matching rooms and prices."
    )]
    pub async fn filter_hotels(
        &self,
        Parameters(input): Parameters<FilterToolInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let criteria = FilterQuery::from(input).into_criteria();
        let hotels = self.catalog.search(&criteria);
        let body = serde_json::to_string(&hotels)
            .map_err(|error| McpError::Internal(error.to_string()).into_error_data())?;
        Ok(CallToolResult::success(vec![Content::text(body)]))
    }

    #[tool(
        description = "Rank hotels by total travel distance to a list of tourist places. Returns a markdown table sorted nearest first."
    )]
    pub async fn hotel_distances(
        &self,
        Parameters(input): Parameters<DistanceToolInput>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = DistanceQuery::from(input)
            .into_request(&self.catalog)
            .map_err(|error| McpError::from(error).into_error_data())?;

        let report = self.ranker.rank(&request).await;
        Ok(CallToolResult::success(vec![Content::text(report.render())]))
    }
}

#[tool_handler]
impl ServerHandler for TripstayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::default()
            },
            instructions: Some(
                "Tripstay MCP Server - hotel search for trip planning agents. \
                 Filter hotels with filter_hotels, then rank them by distance to the \
                 traveller's tourist places with hotel_distances."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
