//! Routes for the progression engine: starting runs, reading state, and
//! resolving decisions.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use lifepath_core::command::Command;
use lifepath_core::error::DomainError;
use lifepath_core::event::DomainEvent;
use lifepath_engine::application::command_handlers;
use lifepath_engine::application::query_handlers::{self, ScenarioView, SimulationView};
use lifepath_engine::domain::commands;
use lifepath_engine::domain::financial::FinancialState;
use lifepath_engine::domain::simulation::StageProgress;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /. All fields default.
#[derive(Debug, Default, Deserialize)]
pub struct StartSimulationRequest {
    /// Starting age; defaults to 16.
    #[serde(default)]
    pub start_age: Option<u32>,
    /// Age ceiling; defaults to 85.
    #[serde(default)]
    pub max_age: Option<u32>,
    /// Opening ledger; defaults to all zeroes.
    #[serde(default)]
    pub starting_state: Option<FinancialState>,
}

/// Request body for POST /{id}/decisions.
#[derive(Debug, Deserialize)]
pub struct ResolveDecisionRequest {
    /// Must match the engine's current scenario.
    pub scenario_id: String,
    /// Must be one of its options.
    pub option_id: String,
}

/// Response body returned after a decision is resolved: the fresh snapshot
/// view plus the types of the events the transition emitted.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    /// The simulation after the transition.
    pub simulation: SimulationView,
    /// Emitted event types, in order.
    pub event_types: Vec<String>,
}

/// POST /
#[instrument(skip(state, request))]
async fn start_simulation(
    State(state): State<AppState>,
    Json(request): Json<StartSimulationRequest>,
) -> Result<Json<SimulationView>, ApiError> {
    let command = commands::StartSimulation {
        correlation_id: Uuid::new_v4(),
        start_age: request.start_age,
        max_age: request.max_age,
        starting_state: request.starting_state,
    };

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        "handling command"
    );

    let result = command_handlers::handle_start_simulation(
        &command,
        &state.catalog,
        state.clock.as_ref(),
        state.simulations.as_ref(),
    )
    .await?;

    Ok(Json(SimulationView::of(&result.simulation)))
}

/// POST /{id}/decisions
#[instrument(skip(state, request), fields(simulation_id = %simulation_id))]
async fn resolve_decision(
    State(state): State<AppState>,
    Path(simulation_id): Path<Uuid>,
    Json(request): Json<ResolveDecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let command = commands::ResolveDecision {
        correlation_id: Uuid::new_v4(),
        simulation_id,
        scenario_id: request.scenario_id,
        option_id: request.option_id,
    };

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        "handling command"
    );

    let result = command_handlers::handle_resolve_decision(
        &command,
        &state.catalog,
        state.clock.as_ref(),
        state.simulations.as_ref(),
    )
    .await?;

    let event_types = result
        .events
        .iter()
        .map(|event| event.event_type().to_owned())
        .collect();

    Ok(Json(DecisionResponse {
        simulation: SimulationView::of(&result.simulation),
        event_types,
    }))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_simulation(
    State(state): State<AppState>,
    Path(simulation_id): Path<Uuid>,
) -> Result<Json<SimulationView>, ApiError> {
    let view =
        query_handlers::get_simulation_by_id(simulation_id, state.simulations.as_ref()).await?;
    Ok(Json(view))
}

/// GET /{id}/scenario — `null` once the run is completed.
#[instrument(skip(state))]
async fn get_current_scenario(
    State(state): State<AppState>,
    Path(simulation_id): Path<Uuid>,
) -> Result<Json<Option<ScenarioView>>, ApiError> {
    let view = query_handlers::get_current_scenario(
        simulation_id,
        &state.catalog,
        state.simulations.as_ref(),
    )
    .await?;
    Ok(Json(view))
}

/// GET /{id}/progress
#[instrument(skip(state))]
async fn get_stage_progress(
    State(state): State<AppState>,
    Path(simulation_id): Path<Uuid>,
) -> Result<Json<Vec<StageProgress>>, ApiError> {
    let progress =
        query_handlers::get_stage_progress(simulation_id, state.simulations.as_ref()).await?;
    Ok(Json(progress))
}

/// GET /{id}/life-event — the legacy predicate-gated random draw. `null`
/// when no pool event passes its gates for the current player facts.
#[instrument(skip(state))]
async fn draw_life_event(
    State(state): State<AppState>,
    Path(simulation_id): Path<Uuid>,
) -> Result<Json<Option<ScenarioView>>, ApiError> {
    let stored = state
        .simulations
        .load_simulation(simulation_id)
        .await?
        .ok_or(DomainError::SimulationNotFound(simulation_id))?;
    let simulation = command_handlers::from_stored(&stored)?;

    let ctx = simulation.eligibility_context();
    let mut rng = state
        .rng
        .lock()
        .map_err(|_| DomainError::Infrastructure("rng lock poisoned".to_owned()))?;
    let event = state
        .catalog
        .pick_life_event(&ctx, &mut *rng)
        .map(ScenarioView::of);

    Ok(Json(event))
}

/// Returns the router for the simulation context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_simulation))
        .route("/{id}", get(get_simulation))
        .route("/{id}/scenario", get(get_current_scenario))
        .route("/{id}/decisions", post(resolve_decision))
        .route("/{id}/progress", get(get_stage_progress))
        .route("/{id}/life-event", get(draw_life_event))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use lifepath_test_support::{FixedClock, InMemorySimulationStore, MockRng, sample_catalog};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let store = Arc::new(InMemorySimulationStore::new());
        AppState::new(
            Arc::new(sample_catalog()),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            )),
            Arc::new(Mutex::new(MockRng)),
            store.clone(),
            store,
        )
    }

    fn app() -> Router {
        router().with_state(test_state())
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_start_simulation_returns_opening_view() {
        let (status, json) = send(app(), "POST", "/", Some(serde_json::json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "active");
        assert_eq!(json["current_age"], 16);
        assert_eq!(json["current_life_stage"], "teenager");
        assert_eq!(json["decisions_resolved"], 0);
    }

    #[tokio::test]
    async fn test_resolve_decision_round_trip() {
        let state = test_state();
        let app = router().with_state(state);

        let (_, started) = send(app.clone(), "POST", "/", Some(serde_json::json!({}))).await;
        let simulation_id = started["simulation_id"].as_str().unwrap().to_owned();

        let (status, json) = send(
            app.clone(),
            "POST",
            &format!("/{simulation_id}/decisions"),
            Some(serde_json::json!({
                "scenario_id": "part-time-job",
                "option_id": "take-job",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["simulation"]["decisions_resolved"], 1);
        assert_eq!(json["simulation"]["current_age"], 17);
        assert_eq!(
            json["event_types"],
            serde_json::json!(["engine.decision_resolved"])
        );

        let (status, scenario) =
            send(app, "GET", &format!("/{simulation_id}/scenario"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scenario["scenario_id"], "first-budget");
    }

    #[tokio::test]
    async fn test_desynchronized_decision_is_a_400() {
        let app = app();
        let (_, started) = send(app.clone(), "POST", "/", Some(serde_json::json!({}))).await;
        let simulation_id = started["simulation_id"].as_str().unwrap().to_owned();

        let (status, json) = send(
            app,
            "POST",
            &format!("/{simulation_id}/decisions"),
            Some(serde_json::json!({
                "scenario_id": "first-budget",
                "option_id": "strict",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_simulation_is_a_404() {
        let missing = Uuid::new_v4();
        let (status, json) = send(app(), "GET", &format!("/{missing}"), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "simulation_not_found");
    }

    #[tokio::test]
    async fn test_life_event_draw_respects_gates() {
        let app = app();
        let (_, started) = send(app.clone(), "POST", "/", Some(serde_json::json!({}))).await;
        let simulation_id = started["simulation_id"].as_str().unwrap().to_owned();

        // Fresh teenager: no savings, no income, so neither pool event
        // passes its gates.
        let (status, json) =
            send(app, "GET", &format!("/{simulation_id}/life-event"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.is_null());
    }
}
