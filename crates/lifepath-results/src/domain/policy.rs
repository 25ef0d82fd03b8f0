//! Declarative grading and trait policy tables.
//!
//! The compiler walks these tables; swapping a threshold or adding a rule
//! never touches compiler code.

use lifepath_engine::domain::simulation::Simulation;

use super::grade::Grade;

/// One grading band: awarded when net worth strictly exceeds the bound.
#[derive(Debug, Clone, Copy)]
pub struct GradeBand {
    /// Exclusive lower bound on net worth.
    pub above: i64,
    /// The grade awarded.
    pub grade: Grade,
}

/// Grading bands in descending order. Anything at or below zero falls
/// through to `F`.
pub const GRADE_BANDS: [GradeBand; 4] = [
    GradeBand {
        above: 1_000_000,
        grade: Grade::A,
    },
    GradeBand {
        above: 500_000,
        grade: Grade::B,
    },
    GradeBand {
        above: 100_000,
        grade: Grade::C,
    },
    GradeBand {
        above: 0,
        grade: Grade::D,
    },
];

/// Maps a final net worth to its grade. Total and monotonic: every value
/// maps to exactly one grade.
#[must_use]
pub fn grade_for(net_worth: i64) -> Grade {
    GRADE_BANDS
        .iter()
        .find(|band| net_worth > band.above)
        .map_or(Grade::F, |band| band.grade)
}

/// Whether a trait rule counts for or against the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    /// Listed under strengths.
    Strength,
    /// Listed under weaknesses; usually carries a recommended topic.
    Weakness,
}

/// One independent rule over the final state and decision log.
///
/// Rules are not mutually exclusive; a result may match any subset of them,
/// including none.
pub struct TraitRule {
    /// Stable rule code.
    pub code: &'static str,
    /// Strength or weakness.
    pub kind: TraitKind,
    /// Line shown to the player.
    pub message: &'static str,
    /// Follow-up topic recommended when the rule matches.
    pub topic: Option<&'static str>,
    /// The predicate.
    pub applies: fn(&Simulation) -> bool,
}

/// The trait rule table.
pub const TRAIT_RULES: &[TraitRule] = &[
    TraitRule {
        code: "debt-free",
        kind: TraitKind::Strength,
        message: "Finished life with no outstanding debt",
        topic: None,
        applies: |s| s.financial_state.debt == 0,
    },
    TraitRule {
        code: "carrying-debt",
        kind: TraitKind::Weakness,
        message: "Finished life still carrying debt",
        topic: Some("debt-management"),
        applies: |s| s.financial_state.debt > 0,
    },
    TraitRule {
        code: "strong-savings",
        kind: TraitKind::Strength,
        message: "Built savings above $100,000",
        topic: None,
        applies: |s| s.financial_state.savings > 100_000,
    },
    TraitRule {
        code: "no-cushion",
        kind: TraitKind::Weakness,
        message: "Finished with no savings cushion at all",
        topic: Some("emergency-funds"),
        applies: |s| s.financial_state.savings == 0,
    },
    TraitRule {
        code: "positive-cash-flow",
        kind: TraitKind::Strength,
        message: "Kept income above expenses",
        topic: None,
        applies: |s| s.financial_state.income > s.financial_state.expenses,
    },
    TraitRule {
        code: "living-beyond-means",
        kind: TraitKind::Weakness,
        message: "Let expenses meet or exceed income",
        topic: Some("budgeting"),
        applies: |s| {
            s.financial_state.expenses > 0
                && s.financial_state.expenses >= s.financial_state.income
        },
    },
    TraitRule {
        code: "grew-net-worth",
        kind: TraitKind::Strength,
        message: "Grew net worth over the course of life",
        topic: None,
        applies: |s| s.financial_state.net_worth() > s.initial_state.net_worth(),
    },
    TraitRule {
        code: "net-worth-declined",
        kind: TraitKind::Weakness,
        message: "Ended with less net worth than at the start",
        topic: Some("investing-basics"),
        applies: |s| s.financial_state.net_worth() < s.initial_state.net_worth(),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds_are_exclusive_lower_bounds() {
        assert_eq!(grade_for(1_000_001), Grade::A);
        assert_eq!(grade_for(1_000_000), Grade::B);
        assert_eq!(grade_for(500_001), Grade::B);
        assert_eq!(grade_for(500_000), Grade::C);
        assert_eq!(grade_for(100_001), Grade::C);
        assert_eq!(grade_for(100_000), Grade::D);
        assert_eq!(grade_for(1), Grade::D);
        assert_eq!(grade_for(0), Grade::F);
        assert_eq!(grade_for(-20_000), Grade::F);
    }

    #[test]
    fn test_grading_is_deterministic_in_net_worth_alone() {
        for net_worth in [-1, 0, 99_999, 550_000, 2_000_000] {
            assert_eq!(grade_for(net_worth), grade_for(net_worth));
        }
    }

    #[test]
    fn test_every_weakness_rule_carries_a_topic() {
        for rule in TRAIT_RULES {
            if rule.kind == TraitKind::Weakness {
                assert!(rule.topic.is_some(), "weakness '{}' has no topic", rule.code);
            }
        }
    }
}
