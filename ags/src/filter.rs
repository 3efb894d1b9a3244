//! Position-angle filtering of catalog candidates.

use ags_types::{CandidateStar, GuideProbeGroup, PositionAngle};

use crate::capability::ProbeValidator;
use crate::context::ObservationContext;

/// Whether `star` is usable by `group` in `ctx` (at `ctx.position_angle`).
///
/// A group none of whose members can validate is trivially valid; otherwise
/// any validating member suffices.
pub fn valid_for_group(
    validator: &dyn ProbeValidator,
    ctx: &ObservationContext,
    star: &CandidateStar,
    group: &GuideProbeGroup,
) -> bool {
    let mut validatable = false;
    for &probe in group.members() {
        match validator.validate(probe, star, ctx) {
            Some(true) => return true,
            Some(false) => validatable = true,
            None => {}
        }
    }
    !validatable
}

/// Candidates valid for `group` at the single angle `angle`, input order kept.
pub fn filter_at_angle(
    validator: &dyn ProbeValidator,
    ctx: &ObservationContext,
    stars: &[CandidateStar],
    group: &GuideProbeGroup,
    angle: PositionAngle,
) -> Vec<CandidateStar> {
    let ctx = ctx.with_position_angle(angle);
    stars
        .iter()
        .filter(|star| valid_for_group(validator, &ctx, star, group))
        .cloned()
        .collect()
}

/// Candidates valid for `group` at one or more of `angles` (union), input order kept.
pub fn filter_any_angle(
    validator: &dyn ProbeValidator,
    ctx: &ObservationContext,
    stars: &[CandidateStar],
    group: &GuideProbeGroup,
    angles: &[PositionAngle],
) -> Vec<CandidateStar> {
    let rotated: Vec<ObservationContext> = angles
        .iter()
        .map(|&angle| ctx.with_position_angle(angle))
        .collect();
    stars
        .iter()
        .filter(|star| {
            rotated
                .iter()
                .any(|ctx| valid_for_group(validator, ctx, star, group))
        })
        .cloned()
        .collect()
}
