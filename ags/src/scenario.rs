//! Self-contained analysis inputs recorded as JSON, with table-driven
//! stand-ins for the validation capability and the asterism search.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ags_types::{Asterism, CandidateStar, GroupKind, GuideProbe, PositionAngle};
use serde::{Deserialize, Serialize};

use crate::capability::ProbeValidator;
use crate::context::ObservationContext;
use crate::error::Result;
use crate::pairing::CatalogSearchResults;
use crate::search::{AsterismCallback, AsterismSearch, SearchError, SearchRequest};

/// Angles at which `probe` can reach `star`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityEntry {
    pub star: String,
    pub probe: GuideProbe,
    pub angles_deg: Vec<f64>,
}

/// An asterism found by a search over the candidates of `group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAsterism {
    pub group: GroupKind,
    pub asterism: Asterism,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub context: ObservationContext,
    /// Empty means "use the configured defaults"
    #[serde(default)]
    pub position_angles_deg: Vec<f64>,
    pub catalog: Vec<CatalogSearchResults>,
    #[serde(default)]
    pub asterisms: Vec<RecordedAsterism>,
    #[serde(default)]
    pub validity: Vec<ValidityEntry>,
    /// Probes without a validation capability
    #[serde(default)]
    pub unvalidatable: Vec<GuideProbe>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn position_angles(&self) -> Vec<PositionAngle> {
        self.position_angles_deg
            .iter()
            .map(|&deg| PositionAngle::from_degrees(deg))
            .collect()
    }

    pub fn validator(&self) -> TableValidator {
        let validator = self
            .validity
            .iter()
            .fold(TableValidator::new(), |v, entry| {
                v.allow(&entry.star, entry.probe, &entry.angles_deg)
            });
        self.unvalidatable
            .iter()
            .fold(validator, |v, &probe| v.without_capability(probe))
    }

    pub fn search(&self) -> PrecomputedSearch {
        PrecomputedSearch::new(self.asterisms.clone())
    }
}

/// Validation from an explicit (star, probe, angle) table. Anything not in
/// the table is invalid.
#[derive(Debug, Clone, Default)]
pub struct TableValidator {
    valid: HashMap<String, HashSet<(GuideProbe, PositionAngle)>>,
    unvalidatable: HashSet<GuideProbe>,
}

impl TableValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, star: &str, probe: GuideProbe, angles_deg: &[f64]) -> Self {
        self.valid
            .entry(star.to_string())
            .or_default()
            .extend(angles_deg.iter().map(|&deg| (probe, PositionAngle::from_degrees(deg))));
        self
    }

    /// Mark `probe` as having no validation capability
    pub fn without_capability(mut self, probe: GuideProbe) -> Self {
        self.unvalidatable.insert(probe);
        self
    }
}

impl ProbeValidator for TableValidator {
    fn validate(
        &self,
        probe: GuideProbe,
        star: &CandidateStar,
        ctx: &ObservationContext,
    ) -> Option<bool> {
        if self.unvalidatable.contains(&probe) {
            return None;
        }
        Some(
            self.valid
                .get(&star.id)
                .is_some_and(|reach| reach.contains(&(probe, ctx.position_angle))),
        )
    }
}

/// Replays recorded asterisms in order, limited to those for the requested
/// group whose stars are all in the request pool.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSearch {
    recorded: Vec<RecordedAsterism>,
}

impl PrecomputedSearch {
    pub fn new(recorded: Vec<RecordedAsterism>) -> Self {
        Self { recorded }
    }

    pub fn with(mut self, group: GroupKind, asterism: Asterism) -> Self {
        self.recorded.push(RecordedAsterism { group, asterism });
        self
    }
}

impl AsterismSearch for PrecomputedSearch {
    fn search(
        &self,
        request: &SearchRequest,
        on_asterism: &mut AsterismCallback,
    ) -> std::result::Result<Vec<Asterism>, SearchError> {
        let in_pool = |star: &CandidateStar| request.pool.iter().any(|p| p.id == star.id);
        let candidates: Vec<&Asterism> = self
            .recorded
            .iter()
            .filter(|r| r.group == request.group.kind())
            .map(|r| &r.asterism)
            .filter(|a| a.stars().iter().all(in_pool))
            .collect();

        let total = candidates.len();
        let mut found = Vec::with_capacity(total);
        for (i, asterism) in candidates.into_iter().enumerate() {
            found.push(asterism.clone());
            on_asterism(asterism, i + 1, total)?;
        }
        Ok(found)
    }
}
