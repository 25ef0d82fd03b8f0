//! The simulation aggregate and its sole mutator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lifepath_catalog::{EligibilityContext, LifeStage, Scenario, ScenarioCatalog, ScenarioCategory, ScenarioOption};
use lifepath_core::clock::Clock;
use lifepath_core::error::DomainError;
use lifepath_core::event::EventMetadata;

use super::events::{
    DecisionResolved, EngineEventKind, SimulationCompleted, SimulationEvent, SimulationStarted,
};
use super::financial::FinancialState;

/// Default starting age.
pub const DEFAULT_START_AGE: u32 = 16;

/// Default age ceiling.
pub const DEFAULT_MAX_AGE: u32 = 85;

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationStatus {
    /// Decisions may still be resolved.
    Active,
    /// Terminal; every further mutation is rejected.
    Completed,
}

impl SimulationStatus {
    /// Stable string form for persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Per-stage completion bookkeeping.
///
/// Invariant: `is_completed ⇔ scenarios_completed >= total_scenarios`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    /// The stage this record tracks.
    pub stage: LifeStage,
    /// Scenarios resolved in this stage so far.
    pub scenarios_completed: u32,
    /// Scenarios the catalog defines for this stage.
    pub total_scenarios: u32,
    /// Whether the stage is exhausted.
    pub is_completed: bool,
}

/// One resolved choice, immutable once recorded.
///
/// Carries a full copy of the chosen option so the log is self-contained
/// for grading and narrative reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// The scenario that was resolved.
    pub scenario_id: String,
    /// The scenario's content category.
    pub category: ScenarioCategory,
    /// Age at which the choice was made (pre-mutation).
    pub age_at_decision: u32,
    /// The chosen option.
    pub option: ScenarioOption,
    /// When the choice was recorded.
    pub decided_at: DateTime<Utc>,
}

/// Tunables for a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Starting age.
    pub start_age: u32,
    /// Age ceiling; the run completes once age reaches it.
    pub max_age: u32,
    /// Opening ledger.
    pub starting_state: FinancialState,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_age: DEFAULT_START_AGE,
            max_age: DEFAULT_MAX_AGE,
            starting_state: FinancialState::default(),
        }
    }
}

/// The aggregate root for one life-simulation run.
///
/// An explicit value type: fully serde-serializable, persisted whole, and
/// mutated exclusively through [`Simulation::resolve_decision`]. Transitions
/// return the events they emit; nothing is buffered inside the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current age.
    pub current_age: u32,
    /// Age ceiling.
    pub max_age: u32,
    /// Ledger snapshot taken at start; the result compiler's baseline.
    pub initial_state: FinancialState,
    /// The live ledger.
    pub financial_state: FinancialState,
    /// The stage currently being played.
    pub current_life_stage: LifeStage,
    /// Index into the current stage's ordered scenario list.
    pub current_stage_scenario_index: usize,
    /// One record per stage in progression order.
    pub stage_progress: Vec<StageProgress>,
    /// Append-only decision log, in chronological order.
    pub decisions: Vec<Decision>,
    /// Lifecycle status.
    pub status: SimulationStatus,
    /// Content hash of the catalog this run was started against.
    pub catalog_version: String,
    /// When the run was created.
    pub started_at: DateTime<Utc>,
}

impl Simulation {
    /// Creates a new run: zeroed progress counters, the first stage
    /// selected, index 0. Emits `SimulationStarted`.
    ///
    /// A stage with zero scenarios is marked completed immediately; catalog
    /// validation rejects such content, so this only matters for snapshots
    /// built from unvalidated sources.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `max_age <= start_age`.
    pub fn start(
        id: Uuid,
        config: SimulationConfig,
        catalog: &ScenarioCatalog,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(Self, SimulationEvent), DomainError> {
        if config.max_age <= config.start_age {
            return Err(DomainError::Validation(format!(
                "max_age {} must be greater than start_age {}",
                config.max_age, config.start_age
            )));
        }

        let stage_progress = LifeStage::ORDER
            .iter()
            .map(|&stage| {
                let total = catalog.total_for(stage);
                StageProgress {
                    stage,
                    scenarios_completed: 0,
                    total_scenarios: total,
                    is_completed: total == 0,
                }
            })
            .collect();

        let simulation = Self {
            id,
            current_age: config.start_age,
            max_age: config.max_age,
            initial_state: config.starting_state,
            financial_state: config.starting_state,
            current_life_stage: LifeStage::first(),
            current_stage_scenario_index: 0,
            stage_progress,
            decisions: Vec::new(),
            status: SimulationStatus::Active,
            catalog_version: catalog.version_hash().to_owned(),
            started_at: clock.now(),
        };

        let event = simulation.event(
            super::events::SIMULATION_STARTED_EVENT_TYPE,
            EngineEventKind::SimulationStarted(SimulationStarted {
                simulation_id: id,
                start_age: config.start_age,
                max_age: config.max_age,
                life_stage: simulation.current_life_stage,
            }),
            correlation_id,
            clock,
        );

        Ok((simulation, event))
    }

    /// Snapshot version: the number of decisions resolved.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn version(&self) -> i64 {
        self.decisions.len() as i64
    }

    /// The scenario at the current index within the current stage's list.
    ///
    /// A pure read, callable repeatedly without changing state. `None` once
    /// the run is completed or if the index is past the end of the list
    /// (a stage awaiting transition).
    #[must_use]
    pub fn current_scenario<'c>(&self, catalog: &'c ScenarioCatalog) -> Option<&'c Scenario> {
        if self.status == SimulationStatus::Completed {
            return None;
        }
        catalog
            .scenarios_for(self.current_life_stage)
            .get(self.current_stage_scenario_index)
    }

    /// The sole mutator: applies the chosen option to the run as one atomic
    /// transition and returns the emitted events (`DecisionResolved`, plus
    /// `SimulationCompleted` when the run ends).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` — leaving the aggregate untouched —
    /// if the run is already completed, if `scenario_id` does not match the
    /// current scenario, or if `option_id` is not one of its options. These
    /// indicate a desynchronized caller, never a game condition.
    ///
    /// # Panics
    ///
    /// Panics if the current stage has no progress record (invariant
    /// guaranteed by [`Simulation::start`]).
    pub fn resolve_decision(
        &mut self,
        catalog: &ScenarioCatalog,
        scenario_id: &str,
        option_id: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Vec<SimulationEvent>, DomainError> {
        if self.status == SimulationStatus::Completed {
            return Err(DomainError::Validation(format!(
                "simulation {} is completed and rejects further decisions",
                self.id
            )));
        }

        let Some(scenario) = self.current_scenario(catalog) else {
            return Err(DomainError::Validation(format!(
                "no scenario is available at index {} of stage '{}'",
                self.current_stage_scenario_index, self.current_life_stage
            )));
        };
        if scenario.id != scenario_id {
            return Err(DomainError::Validation(format!(
                "scenario '{scenario_id}' is not the current scenario '{}'",
                scenario.id
            )));
        }
        let Some(option) = scenario.option(option_id) else {
            return Err(DomainError::Validation(format!(
                "option '{option_id}' does not belong to scenario '{scenario_id}'"
            )));
        };

        // Validation passed; everything below is infallible and applies as
        // one unit.
        let option = option.clone();
        let category = scenario.category;
        let scenario_id = scenario.id.clone();
        let stage_len = catalog.scenarios_for(self.current_life_stage).len();

        let age_delta = option.age_delta();
        let age_at_decision = self.current_age;

        self.financial_state.apply(&option.impact);

        self.decisions.push(Decision {
            scenario_id: scenario_id.clone(),
            category,
            age_at_decision,
            option: option.clone(),
            decided_at: clock.now(),
        });

        let stage = self.current_life_stage;
        let progress = self
            .stage_progress
            .iter_mut()
            .find(|p| p.stage == stage)
            .expect("every stage has a progress record from start");
        progress.scenarios_completed += 1;
        progress.is_completed = progress.scenarios_completed >= progress.total_scenarios;

        self.current_stage_scenario_index += 1;
        let mut content_exhausted = false;
        if self.current_stage_scenario_index >= stage_len {
            match self.current_life_stage.next() {
                Some(next) => {
                    self.current_life_stage = next;
                    self.current_stage_scenario_index = 0;
                }
                None => content_exhausted = true,
            }
        }

        // The age ceiling is checked independently of stage exhaustion: a
        // run can end by running out of years before running out of content.
        if content_exhausted || self.current_age + age_delta >= self.max_age {
            self.status = SimulationStatus::Completed;
        }

        self.current_age += age_delta;

        let mut events = vec![self.event(
            super::events::DECISION_RESOLVED_EVENT_TYPE,
            EngineEventKind::DecisionResolved(DecisionResolved {
                simulation_id: self.id,
                scenario_id,
                option_id: option.id,
                age_at_decision,
                new_age: self.current_age,
                life_stage: self.current_life_stage,
            }),
            correlation_id,
            clock,
        )];
        if self.status == SimulationStatus::Completed {
            events.push(self.event(
                super::events::SIMULATION_COMPLETED_EVENT_TYPE,
                EngineEventKind::SimulationCompleted(SimulationCompleted {
                    simulation_id: self.id,
                    final_age: self.current_age,
                    net_worth: self.financial_state.net_worth(),
                }),
                correlation_id,
                clock,
            ));
        }
        Ok(events)
    }

    /// Read-only progress record for a stage.
    #[must_use]
    pub fn stage_progress(&self, stage: LifeStage) -> Option<&StageProgress> {
        self.stage_progress.iter().find(|p| p.stage == stage)
    }

    /// Logical AND of every stage's completion flag — an alternate
    /// completion check independent of `status`.
    #[must_use]
    pub fn all_stages_completed(&self) -> bool {
        self.stage_progress.iter().all(|p| p.is_completed)
    }

    /// The player facts legacy event gating is evaluated against.
    #[must_use]
    pub fn eligibility_context(&self) -> EligibilityContext {
        EligibilityContext {
            age: self.current_age,
            stage: self.current_life_stage,
            savings: self.financial_state.savings,
            income: self.financial_state.income,
            debt: self.financial_state.debt,
        }
    }

    fn event(
        &self,
        event_type: &'static str,
        kind: EngineEventKind,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> SimulationEvent {
        SimulationEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: event_type.to_owned(),
                simulation_id: self.id,
                sequence_number: self.version(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        }
    }
}
