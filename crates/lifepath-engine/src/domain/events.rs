//! Domain events for the progression engine.
//!
//! Transitions return these instead of buffering them on the aggregate:
//! persistence and UI subscription consume the fresh snapshot plus the
//! events as plain values.

use lifepath_catalog::LifeStage;
use lifepath_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted once when a simulation run is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStarted {
    /// The simulation identifier.
    pub simulation_id: Uuid,
    /// Starting age.
    pub start_age: u32,
    /// Age ceiling.
    pub max_age: u32,
    /// The first life stage.
    pub life_stage: LifeStage,
}

/// Emitted on every resolved decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResolved {
    /// The simulation identifier.
    pub simulation_id: Uuid,
    /// The scenario that was resolved.
    pub scenario_id: String,
    /// The chosen option.
    pub option_id: String,
    /// Age at which the choice was made (pre-mutation).
    pub age_at_decision: u32,
    /// Age after the decision's age advance.
    pub new_age: u32,
    /// Life stage after any stage transition.
    pub life_stage: LifeStage,
}

/// Emitted when a run reaches its terminal condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationCompleted {
    /// The simulation identifier.
    pub simulation_id: Uuid,
    /// Final age.
    pub final_age: u32,
    /// Final net worth (savings minus debt).
    pub net_worth: i64,
}

/// Event type identifier for [`SimulationStarted`].
pub const SIMULATION_STARTED_EVENT_TYPE: &str = "engine.simulation_started";

/// Event type identifier for [`DecisionResolved`].
pub const DECISION_RESOLVED_EVENT_TYPE: &str = "engine.decision_resolved";

/// Event type identifier for [`SimulationCompleted`].
pub const SIMULATION_COMPLETED_EVENT_TYPE: &str = "engine.simulation_completed";

/// Event payload variants for the progression engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEventKind {
    /// A simulation run has been created.
    SimulationStarted(SimulationStarted),
    /// A decision has been resolved.
    DecisionResolved(DecisionResolved),
    /// A simulation run has completed.
    SimulationCompleted(SimulationCompleted),
}

/// Domain event envelope for the progression engine.
#[derive(Debug, Clone)]
pub struct SimulationEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: EngineEventKind,
}

impl DomainEvent for SimulationEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            EngineEventKind::SimulationStarted(_) => SIMULATION_STARTED_EVENT_TYPE,
            EngineEventKind::DecisionResolved(_) => DECISION_RESOLVED_EVENT_TYPE,
            EngineEventKind::SimulationCompleted(_) => SIMULATION_COMPLETED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("EngineEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
