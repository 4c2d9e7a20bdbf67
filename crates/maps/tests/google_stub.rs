use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tripstay_core::config::{AppConfig, MapsConfig};
use tripstay_core::domain::{
    distance::{DistanceOutcome, LookupFailure, ResolvedDestination},
    hotel::Coordinates,
};
use tripstay_core::ranking::{
    batch::batch_distances,
    provider::{DistanceMatrix, Geocoder, MatrixError, ResolutionError},
};
use tripstay_maps::GoogleMapsClient;

const TEST_KEY: &str = "stub-key";

#[derive(Clone, Default)]
struct StubState {
    matrix_calls: Arc<AtomicUsize>,
}

async fn geocode(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("key").map(String::as_str) != Some(TEST_KEY) {
        return Json(json!({"status": "REQUEST_DENIED", "results": [], "error_message": "bad key"}));
    }
    match params.get("address").map(String::as_str) {
        Some("India Gate") => Json(json!({
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 28.6129, "lng": 77.2295}}}]
        })),
        _ => Json(json!({"status": "ZERO_RESULTS", "results": []})),
    }
}

/// Distance in metres is the destination latitude times 1000. Destinations
/// at latitude 0 are unreachable.
async fn distance_matrix(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.matrix_calls.fetch_add(1, Ordering::SeqCst);
    let destinations = params.get("destinations").cloned().unwrap_or_default();
    if params.get("origins").map(String::as_str) == Some("99,99") {
        return Json(json!({"status": "OVER_QUERY_LIMIT", "rows": [], "error_message": "slow down"}));
    }

    let elements: Vec<Value> = destinations
        .split('|')
        .map(|destination| {
            let latitude: f64 =
                destination.split(',').next().and_then(|lat| lat.parse().ok()).unwrap_or(0.0);
            if latitude == 0.0 {
                json!({"status": "ZERO_RESULTS"})
            } else {
                let meters = (latitude * 1000.0) as u64;
                json!({
                    "status": "OK",
                    "distance": {"text": format!("{:.1} km", meters as f64 / 1000.0), "value": meters},
                    "duration": {"text": "10 mins", "value": 600}
                })
            }
        })
        .collect();

    Json(json!({"status": "OK", "rows": [{"elements": elements}]}))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({"status": "OK", "results": []}))
}

async fn spawn_stub() -> (String, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/geocode/json", get(geocode))
        .route("/distancematrix/json", get(distance_matrix))
        .route("/slow/json", get(slow))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let address = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    (format!("http://{address}"), state)
}

fn maps_config(base_url: &str, api_key: Option<&str>) -> MapsConfig {
    let mut maps = AppConfig::default().maps;
    maps.api_key = api_key.map(|key| key.to_string().into());
    maps.geocode_url = format!("{base_url}/geocode/json");
    maps.distance_matrix_url = format!("{base_url}/distancematrix/json");
    maps.timeout_secs = 1;
    maps
}

#[tokio::test]
async fn geocodes_known_place_and_reports_unknown_one() {
    let (base_url, _) = spawn_stub().await;
    let client = GoogleMapsClient::from_config(&maps_config(&base_url, Some(TEST_KEY))).expect("client");

    let coordinates = client.resolve("India Gate").await.expect("known place");
    assert_eq!(coordinates, Coordinates::new(28.6129, 77.2295));

    let error = client.resolve("Atlantis").await.expect_err("unknown place");
    assert!(error.is_unresolvable_place());
}

#[tokio::test]
async fn rejected_key_surfaces_provider_status() {
    let (base_url, _) = spawn_stub().await;
    let client = GoogleMapsClient::from_config(&maps_config(&base_url, Some("wrong"))).expect("client");

    let error = client.resolve("India Gate").await.expect_err("denied");
    assert_eq!(
        error,
        ResolutionError::NotFound { place: "India Gate".to_string(), status: "REQUEST_DENIED".to_string() }
    );
}

#[tokio::test]
async fn matrix_maps_element_statuses() {
    let (base_url, _) = spawn_stub().await;
    let client = GoogleMapsClient::from_config(&maps_config(&base_url, Some(TEST_KEY))).expect("client");

    let outcomes = client
        .lookup(Coordinates::new(1.0, 1.0), &[Coordinates::new(2.5, 0.0), Coordinates::new(0.0, 5.0)])
        .await
        .expect("matrix answer");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].meters(), Some(2_500));
    assert_eq!(outcomes[1], DistanceOutcome::Failed(LookupFailure::ZeroResults));
}

#[tokio::test]
async fn top_level_status_rejects_whole_call() {
    let (base_url, _) = spawn_stub().await;
    let client = GoogleMapsClient::from_config(&maps_config(&base_url, Some(TEST_KEY))).expect("client");

    let error = client
        .lookup(Coordinates::new(99.0, 99.0), &[Coordinates::new(2.0, 0.0)])
        .await
        .expect_err("rejected");

    assert_eq!(
        error,
        MatrixError::Rejected { status: "OVER_QUERY_LIMIT".to_string(), message: Some("slow down".to_string()) }
    );
}

#[tokio::test]
async fn sixty_destinations_are_split_into_three_requests() {
    let (base_url, state) = spawn_stub().await;
    let client = GoogleMapsClient::from_config(&maps_config(&base_url, Some(TEST_KEY))).expect("client");
    let destinations: Vec<ResolvedDestination> = (1..=60)
        .map(|index| ResolvedDestination {
            name: format!("Place {index}"),
            coordinates: Coordinates::new(index as f64, 0.0),
        })
        .collect();

    let distances = batch_distances(&client, Coordinates::new(1.0, 1.0), &destinations, 25).await;

    assert_eq!(state.matrix_calls.load(Ordering::SeqCst), 3);
    assert_eq!(distances.len(), 60);
    assert_eq!(distances[59].outcome.meters(), Some(60_000));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let (base_url, _) = spawn_stub().await;
    let mut maps = maps_config(&base_url, Some(TEST_KEY));
    maps.geocode_url = format!("{base_url}/slow/json");
    let client = GoogleMapsClient::from_config(&maps).expect("client");

    assert_eq!(client.resolve("India Gate").await, Err(ResolutionError::Timeout));
}

#[tokio::test]
async fn unreachable_provider_is_a_network_failure() {
    let maps = maps_config("http://127.0.0.1:9", Some(TEST_KEY));
    let client = GoogleMapsClient::from_config(&maps).expect("client");

    let error = client
        .lookup(Coordinates::new(1.0, 1.0), &[Coordinates::new(2.0, 0.0)])
        .await
        .expect_err("connection refused");
    assert!(matches!(error, MatrixError::Network(_)));
}
