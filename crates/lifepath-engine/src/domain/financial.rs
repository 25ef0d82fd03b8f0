//! The player's financial ledger.

use lifepath_catalog::FinancialImpact;
use serde::{Deserialize, Serialize};

/// The mutable ledger of savings, income, expenses, and debt.
///
/// Single-writer: only the simulation aggregate mutates it, through
/// [`FinancialState::apply`]. Every field is clamped to zero after each
/// mutation — a decision that would drive a field negative floors it at
/// zero instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialState {
    /// Liquid savings.
    pub savings: i64,
    /// Annual income.
    pub income: i64,
    /// Annual expenses.
    pub expenses: i64,
    /// Outstanding debt.
    pub debt: i64,
}

impl FinancialState {
    /// Applies each present field of an impact additively, then clamps
    /// every field to be non-negative.
    pub fn apply(&mut self, impact: &FinancialImpact) {
        if let Some(delta) = impact.savings {
            self.savings += delta;
        }
        if let Some(delta) = impact.income {
            self.income += delta;
        }
        if let Some(delta) = impact.expenses {
            self.expenses += delta;
        }
        if let Some(delta) = impact.debt {
            self.debt += delta;
        }
        self.savings = self.savings.max(0);
        self.income = self.income.max(0);
        self.expenses = self.expenses.max(0);
        self.debt = self.debt.max(0);
    }

    /// Savings minus debt, the primary grading signal.
    #[must_use]
    pub const fn net_worth(&self) -> i64 {
        self.savings - self.debt
    }
}
