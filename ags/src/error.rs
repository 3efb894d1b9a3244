//! Error taxonomy for the selection engine.
//!
//! Infeasibility is not represented here: an asterism that cannot be assigned
//! simply yields no result. Every variant below is fatal to an analysis.

use ags_types::{GroupKind, GuideProbe, TypeError};
use thiserror::Error;

use crate::search::SearchError;

#[derive(Error, Debug)]
pub enum AgsError {
    #[error("Unsupported guide group combination: {tiptilt} tip-tilt with {flexure} flexure")]
    UnsupportedGroupPair {
        tiptilt: GroupKind,
        flexure: GroupKind,
    },

    #[error("Guide probe {0} has no validation capability")]
    MissingCapability(GuideProbe),

    #[error("No position angles requested")]
    NoPositionAngles,

    #[error("Invalid guide star data: {0}")]
    Types(#[from] TypeError),

    #[error("Asterism search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgsError>;
