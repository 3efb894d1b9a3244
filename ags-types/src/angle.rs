//! Telescope position angle.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Instrument position angle, normalized to `[0, 360)` degrees.
///
/// Equality, ordering and hashing are total (`f64::total_cmp` on the
/// normalized value) so angles can key sets and maps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct PositionAngle {
    degrees: f64,
}

impl PositionAngle {
    pub const ZERO: PositionAngle = PositionAngle { degrees: 0.0 };

    pub fn from_degrees(degrees: f64) -> Self {
        let mut normalized = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs, and keeps -0.0
        if normalized >= 360.0 || normalized == 0.0 {
            normalized = 0.0;
        }
        Self {
            degrees: normalized,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }
}

impl Default for PositionAngle {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for PositionAngle {
    fn from(degrees: f64) -> Self {
        Self::from_degrees(degrees)
    }
}

impl From<PositionAngle> for f64 {
    fn from(angle: PositionAngle) -> Self {
        angle.degrees
    }
}

impl PartialEq for PositionAngle {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PositionAngle {}

impl PartialOrd for PositionAngle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PositionAngle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degrees.total_cmp(&other.degrees)
    }
}

impl Hash for PositionAngle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.degrees.to_bits().hash(state);
    }
}

impl fmt::Display for PositionAngle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1} deg", self.degrees)
    }
}
