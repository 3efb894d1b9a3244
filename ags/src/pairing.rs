//! Pairing of per-group catalog results into tip-tilt/flexure combinations.

use ags_types::{CandidateStar, GroupKind, GuideProbeGroup};
use serde::{Deserialize, Serialize};

use crate::error::{AgsError, Result};

/// Catalog candidates found for one probe group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSearchResults {
    pub group: GuideProbeGroup,
    pub stars: Vec<CandidateStar>,
}

impl CatalogSearchResults {
    pub fn new(group: GuideProbeGroup, stars: Vec<CandidateStar>) -> Self {
        Self { group, stars }
    }
}

/// Fails unless one family provides tip-tilt and the other flexure.
pub fn check_group_pair(tiptilt: GroupKind, flexure: GroupKind) -> Result<()> {
    match (tiptilt, flexure) {
        (GroupKind::Cwfs, GroupKind::Odgw) | (GroupKind::Odgw, GroupKind::Cwfs) => Ok(()),
        _ => Err(AgsError::UnsupportedGroupPair { tiptilt, flexure }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TiptiltFlexurePair {
    tiptilt: CatalogSearchResults,
    flexure: CatalogSearchResults,
}

impl TiptiltFlexurePair {
    pub fn new(tiptilt: CatalogSearchResults, flexure: CatalogSearchResults) -> Result<Self> {
        check_group_pair(tiptilt.group.kind(), flexure.group.kind())?;
        Ok(Self { tiptilt, flexure })
    }

    pub fn tiptilt(&self) -> &CatalogSearchResults {
        &self.tiptilt
    }

    pub fn flexure(&self) -> &CatalogSearchResults {
        &self.flexure
    }

    /// Both orientations of every CWFS/ODGW combination in `results`: CWFS
    /// tip-tilt pairs first, then ODGW tip-tilt pairs.
    pub fn pairs(results: &[CatalogSearchResults]) -> Vec<TiptiltFlexurePair> {
        let of_kind = |kind: GroupKind| results.iter().filter(move |r| r.group.kind() == kind);

        let mut pairs = Vec::new();
        for (tiptilt_kind, flexure_kind) in [
            (GroupKind::Cwfs, GroupKind::Odgw),
            (GroupKind::Odgw, GroupKind::Cwfs),
        ] {
            for tiptilt in of_kind(tiptilt_kind) {
                for flexure in of_kind(flexure_kind) {
                    pairs.push(TiptiltFlexurePair {
                        tiptilt: tiptilt.clone(),
                        flexure: flexure.clone(),
                    });
                }
            }
        }
        pairs
    }
}
