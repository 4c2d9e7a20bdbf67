//! MCP tool names exposed by Tripstay.

pub const FILTER_HOTELS: &str = "filter_hotels";
pub const HOTEL_DISTANCES: &str = "hotel_distances";

/// All tool names, sorted
pub const ALL_TOOL_NAMES: &[&str] = &[FILTER_HOTELS, HOTEL_DISTANCES];
