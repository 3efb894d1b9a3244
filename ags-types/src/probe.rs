//! Guide probes and the probe families (groups) they belong to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Guide probe family.
///
/// `Cwfs` is the Canopus wavefront sensor family (three probes), `Odgw` the
/// GSAOI on-detector guide windows (four probes). Ordering puts `Cwfs` first.
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
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum GroupKind {
    Cwfs,
    Odgw,
}

impl GroupKind {
    /// The full member list of the family, in declaration order
    pub fn default_members(self) -> &'static [GuideProbe] {
        match self {
            GroupKind::Cwfs => &[GuideProbe::Cwfs1, GuideProbe::Cwfs2, GuideProbe::Cwfs3],
            GroupKind::Odgw => &[
                GuideProbe::Odgw1,
                GuideProbe::Odgw2,
                GuideProbe::Odgw3,
                GuideProbe::Odgw4,
            ],
        }
    }
}

/// A physical guide probe.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GuideProbe {
    Cwfs1,
    Cwfs2,
    Cwfs3,
    Odgw1,
    Odgw2,
    Odgw3,
    Odgw4,
}

impl GuideProbe {
    pub fn kind(self) -> GroupKind {
        match self {
            GuideProbe::Cwfs1 | GuideProbe::Cwfs2 | GuideProbe::Cwfs3 => GroupKind::Cwfs,
            GuideProbe::Odgw1 | GuideProbe::Odgw2 | GuideProbe::Odgw3 | GuideProbe::Odgw4 => {
                GroupKind::Odgw
            }
        }
    }

    /// Representative of the probe's interchangeability class.
    ///
    /// cwfs1 and cwfs2 are optically equivalent arms and share `Cwfs1` as their
    /// role; every other probe is its own role.
    pub fn role(self) -> GuideProbe {
        match self {
            GuideProbe::Cwfs2 => GuideProbe::Cwfs1,
            other => other,
        }
    }
}

/// Serialized form of a [`GuideProbeGroup`]; members default to the full family.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGroup {
    kind: GroupKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    members: Option<Vec<GuideProbe>>,
}

/// An ordered set of probes drawn from a single family.
///
/// Member order is the default probe try order. Construction rejects empty
/// groups, duplicate members and probes from another family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGroup", into = "RawGroup")]
pub struct GuideProbeGroup {
    kind: GroupKind,
    members: Vec<GuideProbe>,
}

impl GuideProbeGroup {
    pub fn new(kind: GroupKind, members: Vec<GuideProbe>) -> Result<Self, TypeError> {
        if members.is_empty() {
            return Err(TypeError::EmptyGroup(kind));
        }
        for (index, probe) in members.iter().enumerate() {
            if probe.kind() != kind {
                return Err(TypeError::ForeignProbe {
                    probe: *probe,
                    group: kind,
                });
            }
            if members[..index].contains(probe) {
                return Err(TypeError::DuplicateProbe(*probe));
            }
        }
        Ok(Self { kind, members })
    }

    /// The complete family with members in declaration order
    pub fn of_kind(kind: GroupKind) -> Self {
        Self {
            kind,
            members: kind.default_members().to_vec(),
        }
    }

    /// Canopus wavefront sensors cwfs1..cwfs3
    pub fn canopus() -> Self {
        Self::of_kind(GroupKind::Cwfs)
    }

    /// GSAOI on-detector guide windows odgw1..odgw4
    pub fn gsaoi_odgw() -> Self {
        Self::of_kind(GroupKind::Odgw)
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn members(&self) -> &[GuideProbe] {
        &self.members
    }
}

impl TryFrom<RawGroup> for GuideProbeGroup {
    type Error = TypeError;

    fn try_from(raw: RawGroup) -> Result<Self, Self::Error> {
        match raw.members {
            Some(members) => GuideProbeGroup::new(raw.kind, members),
            None => Ok(GuideProbeGroup::of_kind(raw.kind)),
        }
    }
}

impl From<GuideProbeGroup> for RawGroup {
    fn from(group: GuideProbeGroup) -> Self {
        RawGroup {
            kind: group.kind,
            members: Some(group.members),
        }
    }
}

impl fmt::Display for GuideProbeGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
