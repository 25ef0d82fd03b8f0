//! Lifepath — Scenario Catalog bounded context.
//!
//! Owns the immutable content the engine runs against: the fixed life-stage
//! order, per-stage ordered scenario lists, option definitions with their
//! financial and age effects, and the legacy predicate-gated event pool.
//! The catalog is supplied whole at simulation start and never mutated.

pub mod catalog;
pub mod scenario;
pub mod stage;

pub use catalog::{CatalogError, ScenarioCatalog};
pub use scenario::{
    AgeRange, EligibilityContext, FinancialImpact, Prerequisite, Scenario, ScenarioCategory,
    ScenarioOption,
};
pub use stage::LifeStage;
