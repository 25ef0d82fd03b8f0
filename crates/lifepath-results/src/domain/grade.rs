//! Letter grades.

use serde::{Deserialize, Serialize};

/// The graded outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    /// Net worth above one million.
    A,
    /// Net worth above half a million.
    B,
    /// Net worth above one hundred thousand.
    C,
    /// Positive net worth.
    D,
    /// Zero or negative net worth.
    F,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}
