//! The result compiler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lifepath_catalog::ScenarioCategory;
use lifepath_core::error::DomainError;
use lifepath_engine::domain::simulation::{Simulation, SimulationStatus};

use super::grade::Grade;
use super::policy::{TRAIT_RULES, TraitKind, grade_for};

/// Categories that make it into the life story; other decisions are
/// dropped by the projection.
pub const STORY_CATEGORIES: [ScenarioCategory; 3] = [
    ScenarioCategory::Education,
    ScenarioCategory::Career,
    ScenarioCategory::Housing,
];

/// Deltas between the opening and closing ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialChange {
    /// Change in savings.
    pub savings: i64,
    /// Change in debt.
    pub debt: i64,
    /// Change in net worth.
    pub net_worth: i64,
}

/// The graded outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// The simulation this result was compiled from.
    pub simulation_id: Uuid,
    /// Letter grade on final net worth.
    pub grade: Grade,
    /// Final savings minus debt.
    pub final_net_worth: i64,
    /// Opening savings minus debt.
    pub initial_net_worth: i64,
    /// Ledger deltas over the run.
    pub financial_change: FinancialChange,
    /// Matched strength messages.
    pub strengths: Vec<String>,
    /// Matched weakness messages.
    pub weaknesses: Vec<String>,
    /// Deduplicated follow-up topics from matched weaknesses.
    pub recommended_topics: Vec<String>,
    /// Narratively significant decisions, one line each, in order.
    pub life_story: Vec<String>,
}

/// Compiles the result for a completed simulation.
///
/// Idempotent and side-effect-free: two calls on the same simulation yield
/// identical results. Every trait rule is evaluated independently; a result
/// may contain any subset of strengths and weaknesses.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the simulation is still active.
pub fn compile(simulation: &Simulation) -> Result<SimulationResult, DomainError> {
    if simulation.status != SimulationStatus::Completed {
        return Err(DomainError::Validation(format!(
            "simulation {} is still active; results are compiled only on completion",
            simulation.id
        )));
    }

    let final_net_worth = simulation.financial_state.net_worth();
    let initial_net_worth = simulation.initial_state.net_worth();
    let financial_change = FinancialChange {
        savings: simulation.financial_state.savings - simulation.initial_state.savings,
        debt: simulation.financial_state.debt - simulation.initial_state.debt,
        net_worth: final_net_worth - initial_net_worth,
    };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommended_topics: Vec<String> = Vec::new();
    for rule in TRAIT_RULES {
        if !(rule.applies)(simulation) {
            continue;
        }
        match rule.kind {
            TraitKind::Strength => strengths.push(rule.message.to_owned()),
            TraitKind::Weakness => weaknesses.push(rule.message.to_owned()),
        }
        if let Some(topic) = rule.topic
            && !recommended_topics.iter().any(|t| t == topic)
        {
            recommended_topics.push(topic.to_owned());
        }
    }

    let life_story = simulation
        .decisions
        .iter()
        .filter(|decision| STORY_CATEGORIES.contains(&decision.category))
        .map(|decision| {
            format!(
                "Age {}: {}",
                decision.age_at_decision, decision.option.outcome_text
            )
        })
        .collect();

    Ok(SimulationResult {
        simulation_id: simulation.id,
        grade: grade_for(final_net_worth),
        final_net_worth,
        initial_net_worth,
        financial_change,
        strengths,
        weaknesses,
        recommended_topics,
        life_story,
    })
}
