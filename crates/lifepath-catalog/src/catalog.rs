//! The scenario catalog: per-stage ordered scenario lists plus the legacy
//! event pool, validated at load time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use lifepath_core::error::DomainError;
use lifepath_core::rng::DeterministicRng;

use crate::scenario::{EligibilityContext, Scenario};
use crate::stage::LifeStage;

/// Structural defects in catalog content.
///
/// These are the data-integrity failure class: any of them prevents a
/// simulation from starting rather than producing a partially initialized
/// run.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog source could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(String),

    /// A life stage has no scenario list at all.
    #[error("stage '{0}' is missing from the catalog")]
    MissingStage(LifeStage),

    /// A life stage has an empty scenario list.
    #[error("stage '{0}' has zero scenarios")]
    EmptyStage(LifeStage),

    /// A scenario id appears more than once.
    #[error("duplicate scenario id '{0}'")]
    DuplicateScenario(String),

    /// A scenario defines no options.
    #[error("scenario '{0}' has no options")]
    NoOptions(String),

    /// An option id appears more than once within a scenario.
    #[error("duplicate option id '{option_id}' in scenario '{scenario_id}'")]
    DuplicateOption {
        /// The scenario containing the duplicate.
        scenario_id: String,
        /// The duplicated option id.
        option_id: String,
    },

    /// An option carries no financial-impact field at all.
    #[error("option '{option_id}' in scenario '{scenario_id}' has an empty financial impact")]
    EmptyImpact {
        /// The scenario containing the option.
        scenario_id: String,
        /// The offending option id.
        option_id: String,
    },
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err.to_string())
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize, Serialize)]
struct CatalogFile {
    stages: BTreeMap<LifeStage, Vec<Scenario>>,
    #[serde(default)]
    events: Vec<Scenario>,
}

/// The validated, immutable scenario catalog.
///
/// `stages` maps every [`LifeStage`] to its mandatory, ordered scenario
/// list. `events` is the legacy predicate-gated pool drawn from at random;
/// it plays no part in stage progression.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    stages: BTreeMap<LifeStage, Vec<Scenario>>,
    events: Vec<Scenario>,
    version_hash: String,
}

impl ScenarioCatalog {
    /// Builds and validates a catalog from already-parsed content.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for any structural defect: a missing or
    /// empty stage list, duplicate scenario/option ids, an optionless
    /// scenario, or an option with an empty financial impact.
    pub fn new(
        stages: BTreeMap<LifeStage, Vec<Scenario>>,
        events: Vec<Scenario>,
    ) -> Result<Self, CatalogError> {
        validate(&stages, &events)?;
        let version_hash = content_hash(&stages, &events);
        tracing::debug!(version = %version_hash, "catalog validated");
        Ok(Self {
            stages,
            events,
            version_hash,
        })
    }

    /// Parses and validates a catalog from YAML source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the YAML is malformed or names an
    /// unknown stage or category, and any structural [`CatalogError`]
    /// afterwards.
    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.stages, file.events)
    }

    /// The ordered scenario list for a stage. Empty only for a catalog that
    /// bypassed validation.
    #[must_use]
    pub fn scenarios_for(&self, stage: LifeStage) -> &[Scenario] {
        self.stages.get(&stage).map_or(&[], Vec::as_slice)
    }

    /// Number of scenarios in a stage's list.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn total_for(&self, stage: LifeStage) -> u32 {
        self.scenarios_for(stage).len() as u32
    }

    /// The legacy random-event pool.
    #[must_use]
    pub fn events(&self) -> &[Scenario] {
        &self.events
    }

    /// SHA-256 hash of the catalog content, stamped onto every simulation
    /// started against it so stored runs can detect catalog drift.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// Draws one eligible event from the legacy pool, or `None` if no event
    /// passes its gates for the given player facts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pick_life_event(
        &self,
        ctx: &EligibilityContext,
        rng: &mut dyn DeterministicRng,
    ) -> Option<&Scenario> {
        let eligible: Vec<&Scenario> = self
            .events
            .iter()
            .filter(|s| s.is_eligible(ctx))
            .collect();
        if eligible.is_empty() {
            return None;
        }
        let index = rng.next_u32_range(0, eligible.len() as u32 - 1) as usize;
        Some(eligible[index])
    }
}

fn validate(
    stages: &BTreeMap<LifeStage, Vec<Scenario>>,
    events: &[Scenario],
) -> Result<(), CatalogError> {
    for stage in LifeStage::ORDER {
        match stages.get(&stage) {
            None => return Err(CatalogError::MissingStage(stage)),
            Some(list) if list.is_empty() => return Err(CatalogError::EmptyStage(stage)),
            Some(_) => {}
        }
    }

    let mut seen_scenarios = std::collections::HashSet::new();
    let staged = stages.values().flatten();
    for scenario in staged.chain(events.iter()) {
        if !seen_scenarios.insert(scenario.id.clone()) {
            return Err(CatalogError::DuplicateScenario(scenario.id.clone()));
        }
        if scenario.options.is_empty() {
            return Err(CatalogError::NoOptions(scenario.id.clone()));
        }
        let mut seen_options = std::collections::HashSet::new();
        for option in &scenario.options {
            if !seen_options.insert(option.id.as_str()) {
                return Err(CatalogError::DuplicateOption {
                    scenario_id: scenario.id.clone(),
                    option_id: option.id.clone(),
                });
            }
            if option.impact.is_empty() {
                return Err(CatalogError::EmptyImpact {
                    scenario_id: scenario.id.clone(),
                    option_id: option.id.clone(),
                });
            }
        }
    }
    Ok(())
}

fn content_hash(stages: &BTreeMap<LifeStage, Vec<Scenario>>, events: &[Scenario]) -> String {
    // BTreeMap keys iterate in a stable order, so the hash is canonical.
    let canonical = serde_json::to_string(&CatalogFile {
        stages: stages.clone(),
        events: events.to_vec(),
    })
    .expect("catalog serialization is infallible");
    let digest = Sha256::digest(canonical.as_bytes());
    format!("{digest:x}")
}
