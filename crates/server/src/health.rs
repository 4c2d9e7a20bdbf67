use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Copy, Debug)]
pub struct HealthState {
    pub catalog_size: usize,
    pub maps_configured: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub maps: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/", get(root)).route("/health", get(health)).with_state(state)
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { status: "ok", message: "Hotel API is running" })
}

/// An empty catalog makes the service unusable; a missing maps key only
/// degrades the distance endpoints.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = if state.catalog_size > 0 {
        HealthCheck { status: "ready", detail: format!("{} hotels loaded", state.catalog_size) }
    } else {
        HealthCheck { status: "degraded", detail: "hotel catalog is empty".to_string() }
    };
    let maps = if state.maps_configured {
        HealthCheck { status: "ready", detail: "maps api key configured".to_string() }
    } else {
        HealthCheck {
            status: "degraded",
            detail: "maps api key missing; distances report NOT_CONFIGURED".to_string(),
        }
    };

    let catalog_ready = catalog.status == "ready";
    let ready = catalog_ready && maps.status == "ready";
    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "tripstay-server runtime initialized".to_string(),
        },
        catalog,
        maps,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if catalog_ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
