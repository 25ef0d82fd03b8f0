//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// `Validation` is the programming-error class: a caller supplied input that
/// does not match the engine's notion of current state (a desynchronized
/// caller). `Catalog` is the data-integrity class: malformed scenario content
/// detected before it can put a simulation into an inconsistent state.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A simulation was not found in the store.
    #[error("simulation not found: {0}")]
    SimulationNotFound(Uuid),

    /// Optimistic concurrency conflict on a simulation snapshot.
    #[error("concurrency conflict on simulation {simulation_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The simulation that had the conflict.
        simulation_id: Uuid,
        /// The expected snapshot version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A caller-supplied id or option did not match current engine state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed scenario catalog content.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
