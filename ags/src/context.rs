//! Observation context seen by probe validation.

use std::fmt;

use ags_types::{Band, PositionAngle, ProbeAssignment, SkyCoordinates};
use serde::{Deserialize, Serialize};

/// Image quality percentile of the observing conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageQuality {
    Percent20,
    Percent70,
    Percent85,
    Any,
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ImageQuality::Percent20 => "IQ20",
            ImageQuality::Percent70 => "IQ70",
            ImageQuality::Percent85 => "IQ85",
            ImageQuality::Any => "IQAny",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub image_quality: ImageQuality,
}

/// Science instrument in the beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instrument {
    /// GSAOI imager; `catalog_band` is the catalog band equivalent of its filter
    Gsaoi {
        #[serde(default)]
        catalog_band: Option<Band>,
    },
    /// Any other instrument, by name
    Other { name: String },
}

/// Everything probe validation may depend on.
///
/// Values are never mutated in place: the `with_*` methods return updated
/// copies, so an assignment search threads successive contexts through a fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationContext {
    pub base: SkyCoordinates,
    pub instrument: Instrument,
    #[serde(default)]
    pub conditions: Option<Conditions>,
    #[serde(default)]
    pub position_angle: PositionAngle,
    #[serde(default)]
    pub guide_targets: Vec<ProbeAssignment>,
}

impl ObservationContext {
    pub fn new(base: SkyCoordinates, instrument: Instrument) -> Self {
        Self {
            base,
            instrument,
            conditions: None,
            position_angle: PositionAngle::ZERO,
            guide_targets: Vec::new(),
        }
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_position_angle(&self, position_angle: PositionAngle) -> Self {
        Self {
            position_angle,
            ..self.clone()
        }
    }

    /// Make `assignment` the primary target of its probe, replacing any
    /// previous target of that probe.
    pub fn with_guide_target(mut self, assignment: ProbeAssignment) -> Self {
        self.guide_targets.retain(|t| t.probe != assignment.probe);
        self.guide_targets.push(assignment);
        self
    }
}
