//! `PostgreSQL` implementation of the snapshot and result repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use lifepath_core::error::DomainError;
use lifepath_core::repository::{
    ResultRepository, SimulationRepository, StoredResult, StoredSimulation,
};

use crate::schema::{CREATE_RESULTS_TABLE, CREATE_SIMULATIONS_TABLE};

fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

/// PostgreSQL-backed store: one JSONB snapshot row per simulation plus one
/// archived result row per completed run.
#[derive(Debug, Clone)]
pub struct PgSimulationStore {
    pool: PgPool,
}

impl PgSimulationStore {
    /// Creates a new `PgSimulationStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on any database failure.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        for statement in [CREATE_SIMULATIONS_TABLE, CREATE_RESULTS_TABLE] {
            sqlx::raw_sql(statement)
                .execute(&self.pool)
                .await
                .map_err(infrastructure)?;
        }
        tracing::debug!("snapshot store schema ensured");
        Ok(())
    }

    async fn current_version(&self, simulation_id: Uuid) -> Result<i64, DomainError> {
        let row = sqlx::query("SELECT version FROM simulations WHERE simulation_id = $1")
            .bind(simulation_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(row.map_or(0, |r| r.get::<i64, _>("version")))
    }
}

#[async_trait]
impl SimulationRepository for PgSimulationStore {
    async fn load_simulation(
        &self,
        simulation_id: Uuid,
    ) -> Result<Option<StoredSimulation>, DomainError> {
        let row = sqlx::query(
            "SELECT snapshot, version, status, catalog_version, updated_at \
             FROM simulations WHERE simulation_id = $1",
        )
        .bind(simulation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(row.map(|row| StoredSimulation {
            simulation_id,
            snapshot: row.get::<serde_json::Value, _>("snapshot"),
            version: row.get::<i64, _>("version"),
            status: row.get::<String, _>("status"),
            catalog_version: row.get::<String, _>("catalog_version"),
            updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        }))
    }

    async fn save_simulation(
        &self,
        record: &StoredSimulation,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        // Single-statement optimistic write: the upsert only applies when
        // the stored version still matches the one the caller loaded.
        let result = sqlx::query(
            "INSERT INTO simulations \
                 (simulation_id, snapshot, version, status, catalog_version, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (simulation_id) DO UPDATE \
                 SET snapshot = EXCLUDED.snapshot, \
                     version = EXCLUDED.version, \
                     status = EXCLUDED.status, \
                     updated_at = EXCLUDED.updated_at \
                 WHERE simulations.version = $7",
        )
        .bind(record.simulation_id)
        .bind(&record.snapshot)
        .bind(record.version)
        .bind(&record.status)
        .bind(&record.catalog_version)
        .bind(record.updated_at)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;

        if result.rows_affected() == 0 {
            let actual = self.current_version(record.simulation_id).await?;
            return Err(DomainError::ConcurrencyConflict {
                simulation_id: record.simulation_id,
                expected: expected_version,
                actual,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for PgSimulationStore {
    async fn save_result(&self, record: &StoredResult) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO simulation_results (simulation_id, result, archived_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (simulation_id) DO UPDATE \
                 SET result = EXCLUDED.result, archived_at = EXCLUDED.archived_at",
        )
        .bind(record.simulation_id)
        .bind(&record.result)
        .bind(record.archived_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(())
    }

    async fn load_result(
        &self,
        simulation_id: Uuid,
    ) -> Result<Option<StoredResult>, DomainError> {
        let row = sqlx::query(
            "SELECT result, archived_at FROM simulation_results WHERE simulation_id = $1",
        )
        .bind(simulation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(row.map(|row| StoredResult {
            simulation_id,
            result: row.get::<serde_json::Value, _>("result"),
            archived_at: row.get::<DateTime<Utc>, _>("archived_at"),
        }))
    }
}
