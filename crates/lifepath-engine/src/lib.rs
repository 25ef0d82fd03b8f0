//! Lifepath — staged life-progression engine.
//!
//! The single authority for "what scenario is next" and "what happens when
//! an option is chosen". Owns the [`domain::simulation::Simulation`]
//! aggregate; no other component mutates financial state, stage progress,
//! or the decision log.

pub mod application;
pub mod domain;
