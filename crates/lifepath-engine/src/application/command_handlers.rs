//! Command handlers for the progression engine.
//!
//! Application-level orchestration: load the snapshot, run the domain
//! transition, persist the new snapshot with optimistic concurrency, and
//! hand the emitted events back to the caller.

use lifepath_catalog::ScenarioCatalog;
use lifepath_core::clock::Clock;
use lifepath_core::error::DomainError;
use lifepath_core::repository::{SimulationRepository, StoredSimulation};
use uuid::Uuid;

use crate::domain::commands::{ResolveDecision, StartSimulation};
use crate::domain::events::SimulationEvent;
use crate::domain::simulation::{
    DEFAULT_MAX_AGE, DEFAULT_START_AGE, Simulation, SimulationConfig,
};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct EngineCommandResult {
    /// The simulation snapshot after the transition.
    pub simulation: Simulation,
    /// The events the transition emitted.
    pub events: Vec<SimulationEvent>,
}

/// Serializes a simulation into its stored record.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if snapshot serialization fails.
pub fn to_stored(
    simulation: &Simulation,
    clock: &dyn Clock,
) -> Result<StoredSimulation, DomainError> {
    let snapshot = serde_json::to_value(simulation).map_err(|e| {
        DomainError::Infrastructure(format!("snapshot serialization failed: {e}"))
    })?;
    Ok(StoredSimulation {
        simulation_id: simulation.id,
        snapshot,
        version: simulation.version(),
        status: simulation.status.as_str().to_owned(),
        catalog_version: simulation.catalog_version.clone(),
        updated_at: clock.now(),
    })
}

/// Reconstructs a simulation from its stored record.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if snapshot deserialization fails.
pub fn from_stored(stored: &StoredSimulation) -> Result<Simulation, DomainError> {
    serde_json::from_value(stored.snapshot.clone()).map_err(|e| {
        DomainError::Infrastructure(format!("snapshot deserialization failed: {e}"))
    })
}

/// Handles `StartSimulation`: creates the aggregate against the supplied
/// catalog and persists the opening snapshot.
///
/// # Errors
///
/// Returns `DomainError` if the configuration is invalid or persistence
/// fails.
pub async fn handle_start_simulation(
    command: &StartSimulation,
    catalog: &ScenarioCatalog,
    clock: &dyn Clock,
    repo: &dyn SimulationRepository,
) -> Result<EngineCommandResult, DomainError> {
    let simulation_id = Uuid::new_v4();
    let config = SimulationConfig {
        start_age: command.start_age.unwrap_or(DEFAULT_START_AGE),
        max_age: command.max_age.unwrap_or(DEFAULT_MAX_AGE),
        starting_state: command.starting_state.unwrap_or_default(),
    };

    let (simulation, event) =
        Simulation::start(simulation_id, config, catalog, command.correlation_id, clock)?;

    let record = to_stored(&simulation, clock)?;
    repo.save_simulation(&record, 0).await?;
    tracing::debug!(simulation_id = %simulation_id, "simulation started");

    Ok(EngineCommandResult {
        simulation,
        events: vec![event],
    })
}

/// Handles `ResolveDecision`: reconstructs the aggregate, runs the sole
/// mutator, and persists the new snapshot at the loaded version.
///
/// # Errors
///
/// Returns `DomainError::SimulationNotFound` for an unknown simulation,
/// `DomainError::Validation` for a desynchronized caller (the stored
/// snapshot is left untouched), and `DomainError::ConcurrencyConflict` if
/// another writer got there first.
pub async fn handle_resolve_decision(
    command: &ResolveDecision,
    catalog: &ScenarioCatalog,
    clock: &dyn Clock,
    repo: &dyn SimulationRepository,
) -> Result<EngineCommandResult, DomainError> {
    let stored = repo
        .load_simulation(command.simulation_id)
        .await?
        .ok_or(DomainError::SimulationNotFound(command.simulation_id))?;
    let mut simulation = from_stored(&stored)?;
    let expected_version = simulation.version();

    let events = simulation.resolve_decision(
        catalog,
        &command.scenario_id,
        &command.option_id,
        command.correlation_id,
        clock,
    )?;

    let record = to_stored(&simulation, clock)?;
    repo.save_simulation(&record, expected_version).await?;
    tracing::debug!(
        simulation_id = %command.simulation_id,
        scenario_id = %command.scenario_id,
        version = record.version,
        "decision resolved"
    );

    Ok(EngineCommandResult { simulation, events })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use lifepath_core::error::DomainError;
    use lifepath_core::event::DomainEvent;
    use uuid::Uuid;

    use super::{handle_resolve_decision, handle_start_simulation};
    use crate::domain::commands::{ResolveDecision, StartSimulation};
    use crate::domain::simulation::SimulationStatus;
    use lifepath_core::repository::SimulationRepository;
    use lifepath_test_support::{FailingSimulationStore, FixedClock, InMemorySimulationStore, sample_catalog};

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn start_command() -> StartSimulation {
        StartSimulation {
            correlation_id: Uuid::new_v4(),
            start_age: None,
            max_age: None,
            starting_state: None,
        }
    }

    #[tokio::test]
    async fn test_handle_start_simulation_persists_opening_snapshot() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let clock = fixed_clock();

        let result = handle_start_simulation(&start_command(), &catalog, &clock, &store)
            .await
            .unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].event_type(), "engine.simulation_started");

        let stored = store
            .load_simulation(result.simulation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, 0);
        assert_eq!(stored.status, "active");
        assert_eq!(stored.catalog_version, catalog.version_hash());
        assert_eq!(stored.updated_at, clock.0);
    }

    #[tokio::test]
    async fn test_handle_resolve_decision_persists_new_version() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let clock = fixed_clock();

        let started = handle_start_simulation(&start_command(), &catalog, &clock, &store)
            .await
            .unwrap();
        let scenario = started.simulation.current_scenario(&catalog).unwrap();

        let command = ResolveDecision {
            correlation_id: Uuid::new_v4(),
            simulation_id: started.simulation.id,
            scenario_id: scenario.id.clone(),
            option_id: scenario.options[0].id.clone(),
        };
        let resolved = handle_resolve_decision(&command, &catalog, &clock, &store)
            .await
            .unwrap();

        assert_eq!(resolved.simulation.version(), 1);
        assert_eq!(resolved.events[0].event_type(), "engine.decision_resolved");

        let stored = store
            .load_simulation(started.simulation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_handle_resolve_decision_unknown_simulation_is_not_found() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let missing = Uuid::new_v4();

        let command = ResolveDecision {
            correlation_id: Uuid::new_v4(),
            simulation_id: missing,
            scenario_id: "part-time-job".to_owned(),
            option_id: "take-job".to_owned(),
        };
        let result = handle_resolve_decision(&command, &catalog, &fixed_clock(), &store).await;

        match result.unwrap_err() {
            DomainError::SimulationNotFound(id) => assert_eq!(id, missing),
            other => panic!("expected SimulationNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_resolve_decision_rejection_leaves_stored_snapshot_untouched() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let clock = fixed_clock();

        let started = handle_start_simulation(&start_command(), &catalog, &clock, &store)
            .await
            .unwrap();

        let command = ResolveDecision {
            correlation_id: Uuid::new_v4(),
            simulation_id: started.simulation.id,
            scenario_id: "part-time-job".to_owned(),
            option_id: "no-such-option".to_owned(),
        };
        let result = handle_resolve_decision(&command, &catalog, &clock, &store).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let stored = store
            .load_simulation(started.simulation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, 0);
        assert_eq!(stored.status, "active");
    }

    #[tokio::test]
    async fn test_full_run_reaches_completed_status() {
        let catalog = sample_catalog();
        let store = InMemorySimulationStore::new();
        let clock = fixed_clock();

        let started = handle_start_simulation(&start_command(), &catalog, &clock, &store)
            .await
            .unwrap();
        let mut simulation = started.simulation;

        while simulation.status == SimulationStatus::Active {
            let scenario = simulation.current_scenario(&catalog).unwrap();
            let command = ResolveDecision {
                correlation_id: Uuid::new_v4(),
                simulation_id: simulation.id,
                scenario_id: scenario.id.clone(),
                option_id: scenario.options[0].id.clone(),
            };
            simulation = handle_resolve_decision(&command, &catalog, &clock, &store)
                .await
                .unwrap()
                .simulation;
        }

        let stored = store
            .load_simulation(simulation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, "completed");
        assert_eq!(stored.version, simulation.version());
    }

    #[tokio::test]
    async fn test_infrastructure_failure_propagates() {
        let catalog = sample_catalog();
        let store = FailingSimulationStore;

        let result =
            handle_start_simulation(&start_command(), &catalog, &fixed_clock(), &store).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
