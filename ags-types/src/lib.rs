//! Shared guide star types used by the asterism selection engine and its consumers.
//!
//! Everything here is plain serializable data: bands and magnitudes, position
//! angles, catalog stars, guide probes and their groups, Strehl statistics,
//! asterisms and the probe assignment results the engine produces. No engine
//! logic lives in this crate.

mod angle;
mod assignment;
mod band;
mod error;
mod probe;
mod star;
mod strehl;

pub use angle::PositionAngle;
pub use assignment::{AssignmentResult, ProbeAssignment};
pub use band::{Band, Magnitude, MagnitudeLimits};
pub use error::TypeError;
pub use probe::{GroupKind, GuideProbe, GuideProbeGroup};
pub use star::{brightest_first, CandidateStar, SkyCoordinates};
pub use strehl::{Asterism, StrehlStats, MAX_ASTERISM_STARS};
