use thiserror::Error;

use crate::probe::{GroupKind, GuideProbe};

/// Errors raised while constructing guide star types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("Guide probe {probe} is not a member of the {group} family")]
    ForeignProbe { probe: GuideProbe, group: GroupKind },

    #[error("Guide probe {0} listed more than once in its group")]
    DuplicateProbe(GuideProbe),

    #[error("Guide probe group {0} has no members")]
    EmptyGroup(GroupKind),

    #[error("Asterism has {0} stars, expected 1 to 3")]
    InvalidAsterismSize(usize),
}
