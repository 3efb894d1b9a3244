//! Probe assignment: binds every star of a tip-tilt asterism, plus one
//! flexure star, to a concrete guide probe.
//!
//! Rules enforced for a tip-tilt asterism (stars brightest first):
//! - a probe is used at most once per result;
//! - within the CWFS family the special probe ([`CWFS3_RULE_PROBE`]) is
//!   reserved for the brightest star, or failing that for the second
//!   brightest ([`Cwfs3Rule`]), and a one-star asterism may only use it;
//! - a one-star ODGW asterism is never accepted.
//!
//! The flexure star is the brightest candidate any flexure probe accepts.
//! With ODGW tip-tilt the flexure probe is fixed to [`ODGW_FLEXURE_PROBE`].

use ags_types::{
    CandidateStar, GroupKind, GuideProbe, GuideProbeGroup, PositionAngle, ProbeAssignment,
    TypeError, MAX_ASTERISM_STARS,
};
use log::debug;

use crate::capability::{within_limits, MagnitudeLimitTable, ProbeValidator};
use crate::context::ObservationContext;
use crate::error::{AgsError, Result};
use crate::filter::valid_for_group;
use crate::pairing::check_group_pair;

/// CWFS-family probe subject to the brightness rule
pub const CWFS3_RULE_PROBE: GuideProbe = GuideProbe::Cwfs3;

/// The only probe that may take the flexure star when ODGW provides tip-tilt
pub const ODGW_FLEXURE_PROBE: GuideProbe = GuideProbe::Cwfs3;

/// Which star the special CWFS probe is reserved for in one assignment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cwfs3Rule {
    PreferBrightest,
    PreferSecondBrightest,
}

impl Cwfs3Rule {
    /// Passes in the order they are attempted
    pub const PASSES: [Cwfs3Rule; 2] = [Cwfs3Rule::PreferBrightest, Cwfs3Rule::PreferSecondBrightest];

    fn reserved_index(self) -> usize {
        match self {
            Cwfs3Rule::PreferBrightest => 0,
            Cwfs3Rule::PreferSecondBrightest => 1,
        }
    }

    /// Whether `probe` may take the star at brightness rank `index` of an
    /// asterism of `len` stars.
    pub fn permits(self, probe: GuideProbe, index: usize, len: usize) -> bool {
        let special = probe == CWFS3_RULE_PROBE;
        if len <= 1 {
            return special;
        }
        special == (index == self.reserved_index())
    }
}

/// Order in which a group's members are tried for each star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeOrder {
    Declared,
    Reversed,
}

impl ProbeOrder {
    pub fn arrange(self, members: &[GuideProbe]) -> Vec<GuideProbe> {
        match self {
            ProbeOrder::Declared => members.to_vec(),
            ProbeOrder::Reversed => members.iter().rev().copied().collect(),
        }
    }
}

/// One resolver invocation: an asterism at one angle in one probe order.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentRequest<'a> {
    /// Asterism stars, brightest first
    pub tiptilt_stars: &'a [CandidateStar],
    pub tiptilt_group: &'a GuideProbeGroup,
    /// Flexure candidates valid at `position_angle`, brightest first
    pub flexure_stars: &'a [CandidateStar],
    pub flexure_group: &'a GuideProbeGroup,
    pub position_angle: PositionAngle,
    pub order: ProbeOrder,
}

/// Assignments made so far together with the context they imply.
#[derive(Debug, Clone)]
struct Assigned {
    ctx: ObservationContext,
    assignments: Vec<ProbeAssignment>,
}

impl Assigned {
    fn new(ctx: &ObservationContext, capacity: usize) -> Self {
        Self {
            ctx: ctx.clone(),
            assignments: Vec::with_capacity(capacity),
        }
    }

    fn is_taken(&self, probe: GuideProbe) -> bool {
        self.assignments.iter().any(|a| a.probe == probe)
    }

    fn push(mut self, assignment: ProbeAssignment) -> Self {
        self.ctx = self.ctx.with_guide_target(assignment.clone());
        self.assignments.push(assignment);
        self
    }
}

/// Stateless assignment engine over the validation and magnitude capabilities.
#[derive(Clone, Copy)]
pub struct ProbeResolver<'a> {
    validator: &'a dyn ProbeValidator,
    limits: &'a dyn MagnitudeLimitTable,
}

impl<'a> ProbeResolver<'a> {
    pub fn new(validator: &'a dyn ProbeValidator, limits: &'a dyn MagnitudeLimitTable) -> Self {
        Self { validator, limits }
    }

    pub fn validator(&self) -> &'a dyn ProbeValidator {
        self.validator
    }

    /// Geometric validity (absent capability counts as valid) and the
    /// probe's magnitude window, if it has one.
    pub fn probe_accepts(
        &self,
        probe: GuideProbe,
        star: &CandidateStar,
        ctx: &ObservationContext,
    ) -> bool {
        self.validator.validate(probe, star, ctx).unwrap_or(true)
            && self
                .limits
                .limits(probe)
                .map_or(true, |limits| within_limits(star, &limits))
    }

    /// Assign every tip-tilt star and one flexure star.
    ///
    /// `Ok(None)` means no valid assignment exists for this request. Errors
    /// are configuration problems only.
    pub fn resolve(
        &self,
        ctx: &ObservationContext,
        request: &AssignmentRequest,
    ) -> Result<Option<Vec<ProbeAssignment>>> {
        let tiptilt_kind = request.tiptilt_group.kind();
        check_group_pair(tiptilt_kind, request.flexure_group.kind())?;

        let count = request.tiptilt_stars.len();
        if count == 0 || count > MAX_ASTERISM_STARS {
            return Err(TypeError::InvalidAsterismSize(count).into());
        }
        if tiptilt_kind == GroupKind::Odgw && count == 1 {
            return Ok(None);
        }

        let ctx = ctx.with_position_angle(request.position_angle);
        if let Some(star) = request
            .tiptilt_stars
            .iter()
            .find(|star| !valid_for_group(self.validator, &ctx, star, request.tiptilt_group))
        {
            debug!(
                "Star {} is not valid for {} at {}",
                star.id, tiptilt_kind, request.position_angle
            );
            return Ok(None);
        }

        let Some(tiptilt) = self.assign_tiptilt(&ctx, request) else {
            return Ok(None);
        };

        Ok(self.assign_flexure(&tiptilt, request)?.map(|flexure| {
            let mut assignments = tiptilt.assignments;
            assignments.push(flexure);
            assignments
        }))
    }

    fn assign_tiptilt(&self, ctx: &ObservationContext, request: &AssignmentRequest) -> Option<Assigned> {
        match request.tiptilt_group.kind() {
            GroupKind::Cwfs => Cwfs3Rule::PASSES
                .iter()
                .find_map(|&rule| self.tiptilt_pass(ctx, request, Some(rule))),
            GroupKind::Odgw => self.tiptilt_pass(ctx, request, None),
        }
    }

    /// One full pass over the asterism, threading the growing assignment
    /// through a fold so later stars see the probes already placed.
    fn tiptilt_pass(
        &self,
        ctx: &ObservationContext,
        request: &AssignmentRequest,
        rule: Option<Cwfs3Rule>,
    ) -> Option<Assigned> {
        let probes = request.order.arrange(request.tiptilt_group.members());
        let count = request.tiptilt_stars.len();

        request.tiptilt_stars.iter().enumerate().try_fold(
            Assigned::new(ctx, count + 1),
            |assigned, (index, star)| {
                let probe = probes.iter().copied().find(|&probe| {
                    !assigned.is_taken(probe)
                        && rule.map_or(true, |rule| rule.permits(probe, index, count))
                        && self.probe_accepts(probe, star, &assigned.ctx)
                })?;
                Some(assigned.push(ProbeAssignment::new(probe, star.clone())))
            },
        )
    }

    fn assign_flexure(
        &self,
        tiptilt: &Assigned,
        request: &AssignmentRequest,
    ) -> Result<Option<ProbeAssignment>> {
        for star in request.flexure_stars {
            let probe = match request.tiptilt_group.kind() {
                GroupKind::Odgw => {
                    let valid = self
                        .validator
                        .validate(ODGW_FLEXURE_PROBE, star, &tiptilt.ctx)
                        .ok_or(AgsError::MissingCapability(ODGW_FLEXURE_PROBE))?;
                    (valid && !tiptilt.is_taken(ODGW_FLEXURE_PROBE)).then_some(ODGW_FLEXURE_PROBE)
                }
                GroupKind::Cwfs => request.flexure_group.members().iter().copied().find(|&probe| {
                    !tiptilt.is_taken(probe) && self.probe_accepts(probe, star, &tiptilt.ctx)
                }),
            };
            if let Some(probe) = probe {
                return Ok(Some(ProbeAssignment::new(probe, star.clone())));
            }
        }
        Ok(None)
    }
}
