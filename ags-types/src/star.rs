//! Catalog stars offered as guide star candidates.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::band::{Band, Magnitude};

/// ICRS sky position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkyCoordinates {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl SkyCoordinates {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self { ra_deg, dec_deg }
    }
}

/// A catalog star that may be used as a tip-tilt or flexure guide star.
///
/// Identity is the catalog `id`; two candidates with the same id are the
/// same star for assignment and deduplication purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStar {
    pub id: String,
    pub coordinates: SkyCoordinates,
    #[serde(default)]
    pub magnitudes: Vec<Magnitude>,
}

impl CandidateStar {
    pub fn new(id: impl Into<String>, ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            id: id.into(),
            coordinates: SkyCoordinates::new(ra_deg, dec_deg),
            magnitudes: Vec::new(),
        }
    }

    /// Builder-style helper that records (or replaces) the magnitude in `band`
    pub fn with_magnitude(mut self, band: Band, value: f64) -> Self {
        self.magnitudes.retain(|m| m.band != band);
        self.magnitudes.push(Magnitude::new(band, value));
        self
    }

    /// Magnitude in the given band, if the catalog reported one
    pub fn magnitude(&self, band: Band) -> Option<f64> {
        self.magnitudes
            .iter()
            .find(|m| m.band == band)
            .map(|m| m.value)
    }
}

impl fmt::Display for CandidateStar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({:.5}, {:.5})",
            self.id, self.coordinates.ra_deg, self.coordinates.dec_deg
        )
    }
}

/// Brightness order on the reference band: brighter (smaller magnitude)
/// first, stars lacking a reference magnitude last, ties broken by id.
fn brightness_order(a: &CandidateStar, b: &CandidateStar) -> Ordering {
    let by_mag = match (a.magnitude(Band::REFERENCE), b.magnitude(Band::REFERENCE)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_mag.then_with(|| a.id.cmp(&b.id))
}

/// Returns a copy of `stars` sorted brightest first.
pub fn brightest_first(stars: &[CandidateStar]) -> Vec<CandidateStar> {
    let mut sorted = stars.to_vec();
    sorted.sort_by(brightness_order);
    sorted
}
