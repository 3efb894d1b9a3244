//! Strehl statistics and the candidate asterisms they describe.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::star::CandidateStar;

/// Largest tip-tilt asterism the search engine may propose.
pub const MAX_ASTERISM_STARS: usize = 3;

/// Aggregate Strehl statistics of an asterism over the science field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrehlStats {
    pub avg: f64,
    pub rms: f64,
    pub min: f64,
    pub max: f64,
}

impl StrehlStats {
    pub fn new(avg: f64, rms: f64, min: f64, max: f64) -> Self {
        Self { avg, rms, min, max }
    }

    /// Quality order, worst first: average, then minimum, then maximum,
    /// then rms (a smaller spread ranks higher).
    pub fn quality_cmp(&self, other: &Self) -> Ordering {
        self.avg
            .total_cmp(&other.avg)
            .then_with(|| self.min.total_cmp(&other.min))
            .then_with(|| self.max.total_cmp(&other.max))
            .then_with(|| other.rms.total_cmp(&self.rms))
    }
}

impl fmt::Display for StrehlStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "avg={:.3} rms={:.3} min={:.3} max={:.3}",
            self.avg, self.rms, self.min, self.max
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAsterism {
    stars: Vec<CandidateStar>,
    strehl: StrehlStats,
}

/// One to three tip-tilt stars proposed together, with their Strehl statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAsterism", into = "RawAsterism")]
pub struct Asterism {
    stars: Vec<CandidateStar>,
    strehl: StrehlStats,
}

impl Asterism {
    pub fn new(stars: Vec<CandidateStar>, strehl: StrehlStats) -> Result<Self, TypeError> {
        if stars.is_empty() || stars.len() > MAX_ASTERISM_STARS {
            return Err(TypeError::InvalidAsterismSize(stars.len()));
        }
        Ok(Self { stars, strehl })
    }

    pub fn stars(&self) -> &[CandidateStar] {
        &self.stars
    }

    pub fn strehl(&self) -> &StrehlStats {
        &self.strehl
    }
}

impl TryFrom<RawAsterism> for Asterism {
    type Error = TypeError;

    fn try_from(raw: RawAsterism) -> Result<Self, Self::Error> {
        Asterism::new(raw.stars, raw.strehl)
    }
}

impl From<Asterism> for RawAsterism {
    fn from(asterism: Asterism) -> Self {
        RawAsterism {
            stars: asterism.stars,
            strehl: asterism.strehl,
        }
    }
}
