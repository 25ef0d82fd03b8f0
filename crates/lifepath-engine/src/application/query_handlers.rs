//! Query handlers for the progression engine.
//!
//! Reconstruct the aggregate from its stored snapshot and return read-only
//! view DTOs.

use lifepath_catalog::{LifeStage, Scenario, ScenarioCatalog, ScenarioCategory};
use lifepath_core::error::DomainError;
use lifepath_core::repository::SimulationRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::financial::FinancialState;
use crate::domain::simulation::{Simulation, SimulationStatus, StageProgress};

/// Read-only view of a simulation aggregate.
#[derive(Debug, Serialize)]
pub struct SimulationView {
    /// The simulation identifier.
    pub simulation_id: Uuid,
    /// Lifecycle status.
    pub status: SimulationStatus,
    /// Current age.
    pub current_age: u32,
    /// Age ceiling.
    pub max_age: u32,
    /// The stage currently being played.
    pub current_life_stage: LifeStage,
    /// The live ledger.
    pub financial_state: FinancialState,
    /// Savings minus debt.
    pub net_worth: i64,
    /// Number of decisions resolved so far.
    pub decisions_resolved: usize,
    /// Whether every stage's completion flag is set.
    pub all_stages_completed: bool,
}

impl SimulationView {
    /// Projects an aggregate into its read-only view.
    #[must_use]
    pub fn of(simulation: &Simulation) -> Self {
        Self {
            simulation_id: simulation.id,
            status: simulation.status,
            current_age: simulation.current_age,
            max_age: simulation.max_age,
            current_life_stage: simulation.current_life_stage,
            financial_state: simulation.financial_state,
            net_worth: simulation.financial_state.net_worth(),
            decisions_resolved: simulation.decisions.len(),
            all_stages_completed: simulation.all_stages_completed(),
        }
    }
}

/// One option of the current scenario, trimmed for presentation.
#[derive(Debug, Serialize)]
pub struct OptionView {
    /// The option identifier.
    pub option_id: String,
    /// Choice text.
    pub text: String,
}

/// Read-only view of the scenario awaiting a decision.
#[derive(Debug, Serialize)]
pub struct ScenarioView {
    /// The scenario identifier.
    pub scenario_id: String,
    /// Prompt shown to the player.
    pub title: String,
    /// Content category.
    pub category: ScenarioCategory,
    /// The choices, in display order.
    pub options: Vec<OptionView>,
}

impl ScenarioView {
    /// Projects a catalog scenario into its presentation view.
    #[must_use]
    pub fn of(scenario: &Scenario) -> Self {
        Self {
            scenario_id: scenario.id.clone(),
            title: scenario.title.clone(),
            category: scenario.category,
            options: scenario
                .options
                .iter()
                .map(|option| OptionView {
                    option_id: option.id.clone(),
                    text: option.text.clone(),
                })
                .collect(),
        }
    }
}

async fn load(
    simulation_id: Uuid,
    repo: &dyn SimulationRepository,
) -> Result<Simulation, DomainError> {
    let stored = repo
        .load_simulation(simulation_id)
        .await?
        .ok_or(DomainError::SimulationNotFound(simulation_id))?;
    command_handlers::from_stored(&stored)
}

/// Retrieves a simulation view by its id.
///
/// # Errors
///
/// Returns `DomainError::SimulationNotFound` if no snapshot exists, and
/// `DomainError::Infrastructure` if the snapshot cannot be deserialized.
pub async fn get_simulation_by_id(
    simulation_id: Uuid,
    repo: &dyn SimulationRepository,
) -> Result<SimulationView, DomainError> {
    let simulation = load(simulation_id, repo).await?;
    Ok(SimulationView::of(&simulation))
}

/// Retrieves the scenario currently awaiting a decision, or `None` once the
/// run is completed.
///
/// # Errors
///
/// Returns `DomainError::SimulationNotFound` if no snapshot exists.
pub async fn get_current_scenario(
    simulation_id: Uuid,
    catalog: &ScenarioCatalog,
    repo: &dyn SimulationRepository,
) -> Result<Option<ScenarioView>, DomainError> {
    let simulation = load(simulation_id, repo).await?;
    Ok(simulation.current_scenario(catalog).map(ScenarioView::of))
}

/// Retrieves the per-stage progress records, in progression order.
///
/// # Errors
///
/// Returns `DomainError::SimulationNotFound` if no snapshot exists.
pub async fn get_stage_progress(
    simulation_id: Uuid,
    repo: &dyn SimulationRepository,
) -> Result<Vec<StageProgress>, DomainError> {
    let simulation = load(simulation_id, repo).await?;
    Ok(simulation.stage_progress)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::{get_current_scenario, get_simulation_by_id, get_stage_progress};
    use crate::application::command_handlers::{
        handle_resolve_decision, handle_start_simulation,
    };
    use crate::domain::commands::{ResolveDecision, StartSimulation};
    use crate::domain::simulation::SimulationStatus;
    use lifepath_catalog::LifeStage;
    use lifepath_core::error::DomainError;
    use lifepath_test_support::{FixedClock, InMemorySimulationStore, sample_catalog};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    async fn started(
        catalog: &lifepath_catalog::ScenarioCatalog,
        store: &InMemorySimulationStore,
    ) -> Uuid {
        let command = StartSimulation {
            correlation_id: Uuid::new_v4(),
            start_age: None,
            max_age: None,
            starting_state: None,
        };
        handle_start_simulation(&command, catalog, &fixed_clock(), store)
            .await
            .unwrap()
            .simulation
            .id
    }

    #[tokio::test]
    async fn test_get_simulation_by_id_returns_view_with_state() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let simulation_id = started(&catalog, &store).await;

        let view = get_simulation_by_id(simulation_id, &store).await.unwrap();

        assert_eq!(view.simulation_id, simulation_id);
        assert_eq!(view.status, SimulationStatus::Active);
        assert_eq!(view.current_life_stage, LifeStage::Teenager);
        assert_eq!(view.net_worth, 0);
        assert_eq!(view.decisions_resolved, 0);
        assert!(!view.all_stages_completed);
    }

    #[tokio::test]
    async fn test_get_simulation_by_id_unknown_is_not_found() {
        let store = InMemorySimulationStore::new();
        let missing = Uuid::new_v4();

        let result = get_simulation_by_id(missing, &store).await;

        match result.unwrap_err() {
            DomainError::SimulationNotFound(id) => assert_eq!(id, missing),
            other => panic!("expected SimulationNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_current_scenario_tracks_progression() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let simulation_id = started(&catalog, &store).await;

        let first = get_current_scenario(simulation_id, &catalog, &store)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.scenario_id, "part-time-job");
        assert_eq!(first.options.len(), 2);

        let command = ResolveDecision {
            correlation_id: Uuid::new_v4(),
            simulation_id,
            scenario_id: "part-time-job".to_owned(),
            option_id: "take-job".to_owned(),
        };
        handle_resolve_decision(&command, &catalog, &fixed_clock(), &store)
            .await
            .unwrap();

        let second = get_current_scenario(simulation_id, &catalog, &store)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.scenario_id, "first-budget");
    }

    #[tokio::test]
    async fn test_get_stage_progress_is_in_progression_order() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let simulation_id = started(&catalog, &store).await;

        let progress = get_stage_progress(simulation_id, &store).await.unwrap();

        let stages: Vec<LifeStage> = progress.iter().map(|p| p.stage).collect();
        assert_eq!(stages, LifeStage::ORDER);
        assert!(progress.iter().all(|p| p.scenarios_completed == 0));
    }
}
