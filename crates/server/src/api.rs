use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tripstay_core::{
    catalog::Catalog,
    domain::search::{FilterQuery, FilteredHotel},
    errors::{ApplicationError, DomainError, InterfaceError},
    ranking::query::DistanceQuery,
};
use uuid::Uuid;

use crate::bootstrap::{Application, SharedGeocoder, SharedRanker};

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Catalog,
    pub geocoder: SharedGeocoder,
    pub ranker: Arc<SharedRanker>,
}

impl From<&Application> for ApiState {
    fn from(app: &Application) -> Self {
        Self {
            catalog: app.catalog.clone(),
            geocoder: app.geocoder.clone(),
            ranker: app.ranker.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub output: Vec<FilteredHotel>,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    #[serde(default)]
    pub place_name: String,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    /// `[name, latitude, longitude]` triples in request order.
    pub geocoded_places: Vec<(String, f64, f64)>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        let interface = error.into_interface(Uuid::new_v4().to_string());
        match &interface {
            InterfaceError::BadRequest { message, correlation_id } => warn!(
                event_name = "api.request.rejected",
                correlation_id = %correlation_id,
                error = %message,
                "request rejected"
            ),
            InterfaceError::ServiceUnavailable { message, correlation_id }
            | InterfaceError::Internal { message, correlation_id } => error!(
                event_name = "api.request.failed",
                correlation_id = %correlation_id,
                error = %message,
                "request failed"
            ),
        }
        Self(interface)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApplicationError::from(error).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        DomainError::InvalidRequest(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body =
            ErrorBody { detail: self.0.detail(), correlation_id: self.0.correlation_id().to_owned() };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/filter_hotels", post(filter_hotels))
        .route("/hotel_distances", post(hotel_distances))
        .route("/geocode", post(geocode))
        .with_state(state)
}

pub async fn filter_hotels(
    State(state): State<ApiState>,
    payload: Result<Json<FilterQuery>, JsonRejection>,
) -> Result<Json<FilterResponse>, ApiError> {
    let Json(query) = payload?;
    let output = state.catalog.search(&query.into_criteria());
    Ok(Json(FilterResponse { output }))
}

pub async fn hotel_distances(
    State(state): State<ApiState>,
    payload: Result<Json<DistanceQuery>, JsonRejection>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let Json(query) = payload?;
    let request = query.into_request(&state.catalog)?;

    let report = state.ranker.rank(&request).await;
    info!(
        event_name = "api.hotel_distances.done",
        hotels = report.hotels().len(),
        sentinel = report.is_sentinel(),
        "hotel distances served"
    );
    Ok(Json(DistanceResponse { output: report.render() }))
}

/// Resolves a comma separated list of places. Any place that cannot be
/// located fails the whole request.
pub async fn geocode(
    State(state): State<ApiState>,
    payload: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let Json(request) = payload?;
    let places: Vec<&str> =
        request.place_name.split(',').map(str::trim).filter(|place| !place.is_empty()).collect();
    if places.is_empty() {
        return Err(DomainError::InvalidRequest("place_name is required".to_string()).into());
    }

    let mut geocoded_places = Vec::with_capacity(places.len());
    for place in places {
        let coordinates =
            state.geocoder.resolve(place).await.map_err(ApplicationError::from)?;
        geocoded_places.push((place.to_string(), coordinates.latitude, coordinates.longitude));
    }
    Ok(Json(GeocodeResponse { geocoded_places }))
}
