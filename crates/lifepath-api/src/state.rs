//! Shared application state.

use std::sync::{Arc, Mutex};

use lifepath_catalog::ScenarioCatalog;
use lifepath_core::clock::Clock;
use lifepath_core::repository::{ResultRepository, SimulationRepository};
use lifepath_core::rng::DeterministicRng;

/// Application state shared across all request handlers.
///
/// `simulations` and `results` usually point at the same store instance;
/// they are held as separate trait objects so handlers depend only on the
/// capability they use.
#[derive(Clone)]
pub struct AppState {
    /// The validated scenario catalog, loaded once at startup.
    pub catalog: Arc<ScenarioCatalog>,
    /// Clock used to stamp decisions and snapshots.
    pub clock: Arc<dyn Clock>,
    /// RNG used only by the legacy life-event route.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Snapshot persistence.
    pub simulations: Arc<dyn SimulationRepository>,
    /// Archived result persistence.
    pub results: Arc<dyn ResultRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        simulations: Arc<dyn SimulationRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            catalog,
            clock,
            rng,
            simulations,
            results,
        }
    }
}
