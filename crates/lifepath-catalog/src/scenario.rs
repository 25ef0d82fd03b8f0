//! Scenario and option definitions.

use serde::{Deserialize, Serialize};

use crate::stage::LifeStage;

/// Content category of a scenario.
///
/// The result compiler treats `education`, `career` and `housing` as
/// narratively significant when reconstructing a life story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioCategory {
    /// Schooling and training choices.
    Education,
    /// Jobs, promotions, career switches.
    Career,
    /// Renting, buying, moving.
    Housing,
    /// Loans, credit, repayment.
    Debt,
    /// Pension and late-life planning.
    Retirement,
    /// Day-to-day spending and habits.
    Lifestyle,
}

/// Additive deltas an option applies to the financial state.
///
/// Absent fields leave the corresponding ledger field untouched. Deltas may
/// be negative; the ledger clamps every field to zero after application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialImpact {
    /// Change to savings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<i64>,
    /// Change to annual income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<i64>,
    /// Change to annual expenses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<i64>,
    /// Change to outstanding debt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<i64>,
}

impl FinancialImpact {
    /// True if no field is present at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.savings.is_none()
            && self.income.is_none()
            && self.expenses.is_none()
            && self.debt.is_none()
    }
}

/// One choice within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOption {
    /// Option identifier, unique within its scenario.
    pub id: String,
    /// Choice text shown to the player.
    pub text: String,
    /// Financial effect of choosing this option.
    #[serde(default)]
    pub impact: FinancialImpact,
    /// Years of life the choice consumes. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_impact: Option<u32>,
    /// Narration of what happened after the choice.
    pub outcome_text: String,
    /// Optional teaching point attached to the outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_note: Option<String>,
}

impl ScenarioOption {
    /// Years advanced when this option is chosen.
    #[must_use]
    pub fn age_delta(&self) -> u32 {
        self.age_impact.unwrap_or(1)
    }
}

/// Inclusive age window for legacy event gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    /// Minimum age, inclusive.
    pub min: u32,
    /// Maximum age, inclusive.
    pub max: u32,
}

impl AgeRange {
    /// Whether `age` falls inside the window.
    #[must_use]
    pub const fn contains(&self, age: u32) -> bool {
        age >= self.min && age <= self.max
    }
}

/// Financial-state predicate that gates a legacy event.
///
/// Used only by the random-event pool; scenarios in a stage's ordered list
/// are mandatory and carry no gating. Employment is modeled as nonzero
/// income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerequisite {
    /// Minimum savings required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_savings: Option<i64>,
    /// Minimum income required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_income: Option<i64>,
    /// Whether outstanding debt must be present (or absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_debt: Option<bool>,
    /// Whether an income source must be present (or absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_income: Option<bool>,
}

/// Snapshot of the player facts a prerequisite is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext {
    /// Current age.
    pub age: u32,
    /// Current life stage.
    pub stage: LifeStage,
    /// Current savings.
    pub savings: i64,
    /// Current annual income.
    pub income: i64,
    /// Current outstanding debt.
    pub debt: i64,
}

impl Prerequisite {
    /// Whether the predicate holds for the given player facts.
    #[must_use]
    pub fn is_met(&self, ctx: &EligibilityContext) -> bool {
        if let Some(min) = self.min_savings
            && ctx.savings < min
        {
            return false;
        }
        if let Some(min) = self.min_income
            && ctx.income < min
        {
            return false;
        }
        if let Some(wants_debt) = self.has_debt
            && (ctx.debt > 0) != wants_debt
        {
            return false;
        }
        if let Some(wants_income) = self.has_income
            && (ctx.income > 0) != wants_income
        {
            return false;
        }
        true
    }
}

/// A single decision point with a fixed set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier, unique within the catalog.
    pub id: String,
    /// Prompt shown to the player.
    pub title: String,
    /// Content category.
    pub category: ScenarioCategory,
    /// Age window for legacy event gating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRange>,
    /// Stages this scenario may appear in. Empty means any stage
    /// (legacy pool only; staged scenarios live in their stage's list).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub life_stages: Vec<LifeStage>,
    /// The choices, in display order.
    pub options: Vec<ScenarioOption>,
    /// Financial-state gate (legacy pool only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<Prerequisite>,
}

impl Scenario {
    /// Looks up an option by id.
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&ScenarioOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Whether this scenario may be offered to the given player (legacy
    /// random-event gating: stage membership, age window, prerequisite).
    #[must_use]
    pub fn is_eligible(&self, ctx: &EligibilityContext) -> bool {
        if !self.life_stages.is_empty() && !self.life_stages.contains(&ctx.stage) {
            return false;
        }
        if let Some(range) = &self.age_range
            && !range.contains(ctx.age)
        {
            return false;
        }
        self.prerequisite.as_ref().is_none_or(|p| p.is_met(ctx))
    }
}
