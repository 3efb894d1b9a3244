//! Capabilities consumed from collaborators: per-probe geometric validation
//! and per-probe magnitude windows.

use std::collections::HashMap;

use ags_types::{Band, CandidateStar, GuideProbe, MagnitudeLimits};
use serde::{Deserialize, Serialize};

use crate::context::ObservationContext;

/// Geometric / vignetting validity of a star on a probe.
///
/// `ctx` carries the position angle under test and the guide targets assigned
/// so far, since the reach of one probe can depend on where the others sit.
pub trait ProbeValidator: Send + Sync {
    /// `None` when the probe has no validation capability; callers treat that
    /// as trivially valid unless the capability is required.
    fn validate(
        &self,
        probe: GuideProbe,
        star: &CandidateStar,
        ctx: &ObservationContext,
    ) -> Option<bool>;
}

/// Optional per-probe magnitude window.
pub trait MagnitudeLimitTable: Send + Sync {
    fn limits(&self, probe: GuideProbe) -> Option<MagnitudeLimits>;
}

/// True when `star` passes `limits`; a missing magnitude in the limit band passes.
pub fn within_limits(star: &CandidateStar, limits: &MagnitudeLimits) -> bool {
    star.magnitude(limits.band).map_or(true, |mag| limits.contains(mag))
}

/// Magnitude window for one probe, as stored in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeMagnitudeLimits {
    pub probe: GuideProbe,
    pub limits: MagnitudeLimits,
}

/// Nominal limits for the Canopus arms (R band). cwfs3 reaches fainter than
/// cwfs1/cwfs2.
pub const CANOPUS_NOMINAL_LIMITS: [ProbeMagnitudeLimits; 3] = [
    ProbeMagnitudeLimits {
        probe: GuideProbe::Cwfs1,
        limits: MagnitudeLimits {
            band: Band::R,
            bright: 9.0,
            faint: 15.5,
        },
    },
    ProbeMagnitudeLimits {
        probe: GuideProbe::Cwfs2,
        limits: MagnitudeLimits {
            band: Band::R,
            bright: 9.0,
            faint: 15.5,
        },
    },
    ProbeMagnitudeLimits {
        probe: GuideProbe::Cwfs3,
        limits: MagnitudeLimits {
            band: Band::R,
            bright: 9.0,
            faint: 17.0,
        },
    },
];

/// Lookup table of per-probe magnitude windows.
#[derive(Debug, Clone, Default)]
pub struct NominalMagnitudeLimits {
    table: HashMap<GuideProbe, MagnitudeLimits>,
}

impl NominalMagnitudeLimits {
    /// Table with no limits at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn canopus() -> Self {
        Self::from_entries(&CANOPUS_NOMINAL_LIMITS)
    }

    /// Later entries for the same probe replace earlier ones
    pub fn from_entries(entries: &[ProbeMagnitudeLimits]) -> Self {
        Self {
            table: entries.iter().map(|e| (e.probe, e.limits)).collect(),
        }
    }
}

impl MagnitudeLimitTable for NominalMagnitudeLimits {
    fn limits(&self, probe: GuideProbe) -> Option<MagnitudeLimits> {
        self.table.get(&probe).copied()
    }
}
