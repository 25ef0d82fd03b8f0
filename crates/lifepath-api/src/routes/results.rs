//! Route for compiled results of completed runs.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;
use uuid::Uuid;

use lifepath_results::application::query_handlers;
use lifepath_results::domain::compiler::SimulationResult;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{id}/result — compiles (and archives) the result. Rejected with a
/// validation error while the run is still active.
#[instrument(skip(state))]
async fn get_result(
    State(state): State<AppState>,
    Path(simulation_id): Path<Uuid>,
) -> Result<Json<SimulationResult>, ApiError> {
    let result = query_handlers::get_result_for_simulation(
        simulation_id,
        state.clock.as_ref(),
        state.simulations.as_ref(),
        state.results.as_ref(),
    )
    .await?;
    Ok(Json(result))
}

/// Returns the router for the results context.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/result", get(get_result))
}
