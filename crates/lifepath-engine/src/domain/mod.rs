//! Domain layer: the simulation aggregate, its commands and events.

pub mod commands;
pub mod events;
pub mod financial;
pub mod simulation;
