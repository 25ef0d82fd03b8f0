//! Lifepath — Result Compiler bounded context.
//!
//! Consumes a completed simulation and produces a graded outcome: letter
//! grade, strengths and weaknesses, recommended follow-up topics, and a
//! short life story. Grading thresholds and trait rules live in declarative
//! policy tables, not inline conditionals, so tuning never touches the
//! compiler.

pub mod application;
pub mod domain;
