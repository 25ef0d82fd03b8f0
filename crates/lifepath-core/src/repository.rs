//! Simulation snapshot repository abstractions.
//!
//! The aggregate is persisted whole: one JSON snapshot per simulation, no
//! engine state outside the record. Writes carry the expected snapshot
//! version (decision count) for optimistic concurrency.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a simulation snapshot.
#[derive(Debug, Clone)]
pub struct StoredSimulation {
    /// The simulation identifier.
    pub simulation_id: Uuid,
    /// Serialized simulation aggregate.
    pub snapshot: serde_json::Value,
    /// Snapshot version (number of decisions resolved).
    pub version: i64,
    /// Lifecycle status at save time (`active` or `completed`).
    pub status: String,
    /// Content hash of the catalog the run was started against.
    pub catalog_version: String,
    /// Timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}

/// Stored representation of a compiled simulation result.
#[derive(Debug, Clone)]
pub struct StoredResult {
    /// The simulation the result was compiled from.
    pub simulation_id: Uuid,
    /// Serialized result record.
    pub result: serde_json::Value,
    /// Timestamp of archival.
    pub archived_at: DateTime<Utc>,
}

/// Repository trait for loading and saving simulation snapshots.
#[async_trait]
pub trait SimulationRepository: Send + Sync {
    /// Load the latest snapshot for a simulation, if one exists.
    async fn load_simulation(
        &self,
        simulation_id: Uuid,
    ) -> Result<Option<StoredSimulation>, DomainError>;

    /// Save a snapshot, replacing the one at `expected_version`.
    ///
    /// `expected_version` is the version the caller loaded; a mismatch must
    /// fail with [`DomainError::ConcurrencyConflict`]. A new simulation is
    /// saved with `expected_version == 0`.
    async fn save_simulation(
        &self,
        record: &StoredSimulation,
        expected_version: i64,
    ) -> Result<(), DomainError>;
}

/// Repository trait for archiving compiled results of completed runs.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Archive a compiled result. Re-archiving overwrites; the compiler is
    /// idempotent so the content is identical.
    async fn save_result(&self, record: &StoredResult) -> Result<(), DomainError>;

    /// Load an archived result, if one exists.
    async fn load_result(&self, simulation_id: Uuid)
    -> Result<Option<StoredResult>, DomainError>;
}
