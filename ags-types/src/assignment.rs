//! Probe assignments and the ranked results built from them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::PositionAngle;
use crate::probe::{GroupKind, GuideProbe};
use crate::star::CandidateStar;
use crate::strehl::StrehlStats;

/// One guide probe bound to one star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeAssignment {
    pub probe: GuideProbe,
    pub star: CandidateStar,
}

impl ProbeAssignment {
    pub fn new(probe: GuideProbe, star: CandidateStar) -> Self {
        Self { probe, star }
    }
}

impl fmt::Display for ProbeAssignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.probe, self.star.id)
    }
}

/// A complete, valid guide configuration at one position angle.
///
/// `assignments` holds the tip-tilt stars brightest first followed by exactly
/// one flexure star.
///
/// # Ordering
/// Ascending order runs from worst to best:
/// 1. Strehl statistics ([`StrehlStats::quality_cmp`])
/// 2. position angle, smaller angles ranking higher
/// 3. tip-tilt group, CWFS ranking above ODGW
/// 4. the star-to-role mapping, with cwfs1 and cwfs2 sharing a role
///    (see [`GuideProbe::role`]); lexicographically smaller ranks higher
/// 5. the concrete probe list, lexicographically smaller ranking higher
///
/// Keys 1-4 form the ranking ([`AssignmentResult::rank_cmp`]); results equal
/// under it are interchangeable configurations. Key 5 makes the order total
/// and consistent with equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub position_angle: PositionAngle,
    pub tiptilt_group: GroupKind,
    pub strehl: StrehlStats,
    pub assignments: Vec<ProbeAssignment>,
}

impl AssignmentResult {
    pub fn new(
        position_angle: PositionAngle,
        tiptilt_group: GroupKind,
        strehl: StrehlStats,
        assignments: Vec<ProbeAssignment>,
    ) -> Self {
        Self {
            position_angle,
            tiptilt_group,
            strehl,
            assignments,
        }
    }

    /// The tip-tilt part of the assignment list
    pub fn tiptilt_assignments(&self) -> &[ProbeAssignment] {
        match self.assignments.split_last() {
            Some((_, tiptilt)) => tiptilt,
            None => &[],
        }
    }

    /// The flexure assignment (always the last entry)
    pub fn flexure_assignment(&self) -> Option<&ProbeAssignment> {
        self.assignments.last()
    }

    /// Probe bound to the star with the given id, if any
    pub fn probe_for(&self, star_id: &str) -> Option<GuideProbe> {
        self.assignments
            .iter()
            .find(|a| a.star.id == star_id)
            .map(|a| a.probe)
    }

    /// True when no probe appears twice
    pub fn has_distinct_probes(&self) -> bool {
        self.assignments
            .iter()
            .enumerate()
            .all(|(i, a)| self.assignments[..i].iter().all(|b| b.probe != a.probe))
    }

    fn role_signature(&self) -> impl Iterator<Item = (&str, GuideProbe)> {
        self.assignments
            .iter()
            .map(|a| (a.star.id.as_str(), a.probe.role()))
    }

    fn probe_signature(&self) -> impl Iterator<Item = (&str, GuideProbe)> {
        self.assignments
            .iter()
            .map(|a| (a.star.id.as_str(), a.probe))
    }

    /// Ranking order, worst first; equal results are interchangeable configurations
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.strehl
            .quality_cmp(&other.strehl)
            .then_with(|| other.position_angle.cmp(&self.position_angle))
            .then_with(|| other.tiptilt_group.cmp(&self.tiptilt_group))
            .then_with(|| other.role_signature().cmp(self.role_signature()))
    }
}

impl PartialEq for AssignmentResult {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AssignmentResult {}

impl PartialOrd for AssignmentResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AssignmentResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank_cmp(other)
            .then_with(|| other.probe_signature().cmp(self.probe_signature()))
    }
}

impl fmt::Display for AssignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} at {}, Strehl {}, [",
            self.tiptilt_group, self.position_angle, self.strehl
        )?;
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{assignment}")?;
        }
        write!(f, "]")
    }
}
