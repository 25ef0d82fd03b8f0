//! Test stores — in-memory and failing `SimulationRepository` /
//! `ResultRepository` implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lifepath_core::error::DomainError;
use lifepath_core::repository::{
    ResultRepository, SimulationRepository, StoredResult, StoredSimulation,
};
use uuid::Uuid;

/// A thread-safe in-memory store with real optimistic-concurrency checks,
/// backing handler and route tests without a database.
#[derive(Debug, Default)]
pub struct InMemorySimulationStore {
    simulations: Mutex<HashMap<Uuid, StoredSimulation>>,
    results: Mutex<HashMap<Uuid, StoredResult>>,
}

impl InMemorySimulationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SimulationRepository for InMemorySimulationStore {
    async fn load_simulation(
        &self,
        simulation_id: Uuid,
    ) -> Result<Option<StoredSimulation>, DomainError> {
        Ok(self.simulations.lock().unwrap().get(&simulation_id).cloned())
    }

    async fn save_simulation(
        &self,
        record: &StoredSimulation,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let mut simulations = self.simulations.lock().unwrap();
        let actual = simulations
            .get(&record.simulation_id)
            .map_or(0, |existing| existing.version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                simulation_id: record.simulation_id,
                expected: expected_version,
                actual,
            });
        }
        simulations.insert(record.simulation_id, record.clone());
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemorySimulationStore {
    async fn save_result(&self, record: &StoredResult) -> Result<(), DomainError> {
        self.results
            .lock()
            .unwrap()
            .insert(record.simulation_id, record.clone());
        Ok(())
    }

    async fn load_result(
        &self,
        simulation_id: Uuid,
    ) -> Result<Option<StoredResult>, DomainError> {
        Ok(self.results.lock().unwrap().get(&simulation_id).cloned())
    }
}

/// A store whose every operation fails with an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingSimulationStore;

#[async_trait]
impl SimulationRepository for FailingSimulationStore {
    async fn load_simulation(
        &self,
        _simulation_id: Uuid,
    ) -> Result<Option<StoredSimulation>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save_simulation(
        &self,
        _record: &StoredSimulation,
        _expected_version: i64,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[async_trait]
impl ResultRepository for FailingSimulationStore {
    async fn save_result(&self, _record: &StoredResult) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn load_result(
        &self,
        _simulation_id: Uuid,
    ) -> Result<Option<StoredResult>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
