//! Commands for the progression engine.

use lifepath_core::command::Command;
use uuid::Uuid;

use super::financial::FinancialState;

/// Command to start a new simulation run.
#[derive(Debug, Clone)]
pub struct StartSimulation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Starting age; defaults to 16.
    pub start_age: Option<u32>,
    /// Age ceiling; defaults to 85.
    pub max_age: Option<u32>,
    /// Opening ledger; defaults to all zeroes.
    pub starting_state: Option<FinancialState>,
}

impl Command for StartSimulation {
    fn command_type(&self) -> &'static str {
        "engine.start_simulation"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to resolve the current scenario with a chosen option.
#[derive(Debug, Clone)]
pub struct ResolveDecision {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The simulation to mutate.
    pub simulation_id: Uuid,
    /// Must match the id of the engine's current scenario.
    pub scenario_id: String,
    /// Must be one of the current scenario's options.
    pub option_id: String,
}

impl Command for ResolveDecision {
    fn command_type(&self) -> &'static str {
        "engine.resolve_decision"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
