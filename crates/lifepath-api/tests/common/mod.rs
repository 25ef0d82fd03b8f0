//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;

use lifepath_api::routes;
use lifepath_api::state::AppState;
use lifepath_core::clock::Clock;
use lifepath_core::rng::DeterministicRng;
use lifepath_test_support::{FixedClock, InMemorySimulationStore, SequenceRng, sample_catalog};

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    ))
}

/// Build the full app router with the in-memory store and deterministic
/// Clock/RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_rng(SequenceRng::new(vec![]))
}

/// Build the full app router with a custom `SequenceRng` for tests that
/// need deterministic life-event draws.
pub fn build_test_app_with_rng(rng: SequenceRng) -> Router {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let store = Arc::new(InMemorySimulationStore::new());
    let app_state = AppState::new(
        Arc::new(sample_catalog()),
        fixed_clock(),
        rng,
        store.clone(),
        store,
    );

    Router::new()
        .merge(routes::health::router())
        .nest(
            "/api/v1/simulations",
            routes::simulation::router().merge(routes::results::router()),
        )
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
