//! The fixed, totally ordered sequence of life stages.

use serde::{Deserialize, Serialize};

/// One era of the simulated life.
///
/// The order is fixed and total: a simulation only ever advances forward
/// through [`LifeStage::ORDER`], never skips a stage and never revisits one.
/// Branching exists only within a stage's scenario list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifeStage {
    /// Ages roughly 13–19.
    Teenager,
    /// Ages roughly 20–29.
    YoungAdult,
    /// Ages roughly 30–44.
    Adult,
    /// Ages roughly 45–59.
    MiddleAge,
    /// Ages roughly 60–74.
    Senior,
    /// Ages 75 and up.
    Elderly,
}

impl LifeStage {
    /// Every stage, in progression order.
    pub const ORDER: [Self; 6] = [
        Self::Teenager,
        Self::YoungAdult,
        Self::Adult,
        Self::MiddleAge,
        Self::Senior,
        Self::Elderly,
    ];

    /// The stage every simulation starts in.
    #[must_use]
    pub const fn first() -> Self {
        Self::Teenager
    }

    /// The stage that follows this one, or `None` for the final stage.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Teenager => Some(Self::YoungAdult),
            Self::YoungAdult => Some(Self::Adult),
            Self::Adult => Some(Self::MiddleAge),
            Self::MiddleAge => Some(Self::Senior),
            Self::Senior => Some(Self::Elderly),
            Self::Elderly => None,
        }
    }

    /// Human-readable stage name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Teenager => "teenager",
            Self::YoungAdult => "young-adult",
            Self::Adult => "adult",
            Self::MiddleAge => "middle-age",
            Self::Senior => "senior",
            Self::Elderly => "elderly",
        }
    }
}

impl std::fmt::Display for LifeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
