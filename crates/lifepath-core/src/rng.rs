//! Random number generator abstraction for determinism.
//!
//! The staged progression engine is fully deterministic and never draws
//! randomness. Only the legacy random-event catalog variant does, through
//! this trait, so tests can inject a scripted sequence.

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// Production RNG backed by the thread-local generator.
#[derive(Debug, Clone, Copy)]
pub struct SystemRng;

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::Rng::random_range(&mut rand::rng(), min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        rand::Rng::random(&mut rand::rng())
    }
}
