//! Query handlers for the Result Compiler context.

use uuid::Uuid;

use lifepath_core::clock::Clock;
use lifepath_core::error::DomainError;
use lifepath_core::repository::{ResultRepository, SimulationRepository, StoredResult};
use lifepath_engine::application::command_handlers::from_stored;

use crate::domain::compiler::{SimulationResult, compile};

/// Compiles the result for a completed simulation and archives it for
/// historical storage.
///
/// Compilation is idempotent, so re-archiving overwrites with identical
/// content.
///
/// # Errors
///
/// Returns `DomainError::SimulationNotFound` for an unknown simulation,
/// `DomainError::Validation` while the run is still active, and
/// `DomainError::Infrastructure` on store failures.
pub async fn get_result_for_simulation(
    simulation_id: Uuid,
    clock: &dyn Clock,
    simulations: &dyn SimulationRepository,
    results: &dyn ResultRepository,
) -> Result<SimulationResult, DomainError> {
    let stored = simulations
        .load_simulation(simulation_id)
        .await?
        .ok_or(DomainError::SimulationNotFound(simulation_id))?;
    let simulation = from_stored(&stored)?;

    let result = compile(&simulation)?;

    let record = StoredResult {
        simulation_id,
        result: serde_json::to_value(&result).map_err(|e| {
            DomainError::Infrastructure(format!("result serialization failed: {e}"))
        })?,
        archived_at: clock.now(),
    };
    results.save_result(&record).await?;
    tracing::debug!(simulation_id = %simulation_id, grade = %result.grade, "result archived");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::get_result_for_simulation;
    use lifepath_core::error::DomainError;
    use lifepath_core::repository::ResultRepository;
    use lifepath_engine::application::command_handlers::{
        handle_resolve_decision, handle_start_simulation,
    };
    use lifepath_engine::domain::commands::{ResolveDecision, StartSimulation};
    use lifepath_engine::domain::simulation::SimulationStatus;
    use lifepath_test_support::{FixedClock, InMemorySimulationStore, sample_catalog};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    async fn run_to_completion(
        catalog: &lifepath_catalog::ScenarioCatalog,
        store: &InMemorySimulationStore,
    ) -> Uuid {
        let command = StartSimulation {
            correlation_id: Uuid::new_v4(),
            start_age: None,
            max_age: None,
            starting_state: None,
        };
        let mut simulation = handle_start_simulation(&command, catalog, &fixed_clock(), store)
            .await
            .unwrap()
            .simulation;

        while simulation.status == SimulationStatus::Active {
            let scenario = simulation.current_scenario(catalog).unwrap();
            let command = ResolveDecision {
                correlation_id: Uuid::new_v4(),
                simulation_id: simulation.id,
                scenario_id: scenario.id.clone(),
                option_id: scenario.options[0].id.clone(),
            };
            simulation = handle_resolve_decision(&command, catalog, &fixed_clock(), store)
                .await
                .unwrap()
                .simulation;
        }
        simulation.id
    }

    #[tokio::test]
    async fn test_result_is_compiled_and_archived() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let simulation_id = run_to_completion(&catalog, &store).await;

        let result = get_result_for_simulation(simulation_id, &fixed_clock(), &store, &store)
            .await
            .unwrap();

        assert_eq!(result.simulation_id, simulation_id);
        assert!(!result.life_story.is_empty());

        let archived = store.load_result(simulation_id).await.unwrap().unwrap();
        assert_eq!(archived.simulation_id, simulation_id);
        assert_eq!(archived.result, serde_json::to_value(&result).unwrap());
    }

    #[tokio::test]
    async fn test_repeated_compilation_yields_identical_results() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let simulation_id = run_to_completion(&catalog, &store).await;

        let first = get_result_for_simulation(simulation_id, &fixed_clock(), &store, &store)
            .await
            .unwrap();
        let second = get_result_for_simulation(simulation_id, &fixed_clock(), &store, &store)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_active_simulation_is_rejected() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let command = StartSimulation {
            correlation_id: Uuid::new_v4(),
            start_age: None,
            max_age: None,
            starting_state: None,
        };
        let simulation_id = handle_start_simulation(&command, &catalog, &fixed_clock(), &store)
            .await
            .unwrap()
            .simulation
            .id;

        let result =
            get_result_for_simulation(simulation_id, &fixed_clock(), &store, &store).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(store.load_result(simulation_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_simulation_is_not_found() {
        let store = InMemorySimulationStore::new();
        let missing = Uuid::new_v4();

        let result = get_result_for_simulation(missing, &fixed_clock(), &store, &store).await;

        match result.unwrap_err() {
            DomainError::SimulationNotFound(id) => assert_eq!(id, missing),
            other => panic!("expected SimulationNotFound, got {other:?}"),
        }
    }
}
