//! Photometric bands, catalog magnitudes and magnitude windows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Photometric band a catalog magnitude is quoted in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum Band {
    U,
    B,
    V,
    R,
    I,
    J,
    H,
    K,
}

impl Band {
    /// Band used for brightness ordering and for every tip-tilt group
    /// that does not report its own catalog band.
    pub const REFERENCE: Band = Band::R;
}

/// A single catalog magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Magnitude {
    pub band: Band,
    pub value: f64,
}

impl Magnitude {
    pub fn new(band: Band, value: f64) -> Self {
        Self { band, value }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={:.2}", self.band, self.value)
    }
}

/// Inclusive magnitude window in one band.
///
/// `bright` is the numerically smaller bound. A star is inside the window
/// when `bright <= mag <= faint`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeLimits {
    pub band: Band,
    pub bright: f64,
    pub faint: f64,
}

impl MagnitudeLimits {
    pub fn new(band: Band, bright: f64, faint: f64) -> Self {
        Self {
            band,
            bright,
            faint,
        }
    }

    /// Whether `value`, measured in `self.band`, lies inside the window
    pub fn contains(&self, value: f64) -> bool {
        value >= self.bright && value <= self.faint
    }
}
