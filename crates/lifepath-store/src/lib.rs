//! Lifepath — PostgreSQL persistence for simulation snapshots and archived
//! results.

pub mod pg_store;
pub mod schema;

pub use pg_store::PgSimulationStore;
