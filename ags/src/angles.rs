//! Fan-out of the resolver over position angles and probe try-orders.

use ags_types::{
    brightest_first, AssignmentResult, Asterism, CandidateStar, GroupKind, GuideProbeGroup,
    PositionAngle,
};

use crate::context::ObservationContext;
use crate::error::Result;
use crate::filter::filter_at_angle;
use crate::resolver::{AssignmentRequest, ProbeOrder, ProbeResolver};

/// Try-orders used for a tip-tilt family. Only the CWFS family has two
/// interchangeable arms worth disambiguating.
pub fn probe_orders(kind: GroupKind) -> &'static [ProbeOrder] {
    match kind {
        GroupKind::Cwfs => &[ProbeOrder::Reversed, ProbeOrder::Declared],
        GroupKind::Odgw => &[ProbeOrder::Reversed],
    }
}

/// Every valid assignment of `asterism` across `angles`, unranked.
///
/// `flexure_pool` is refiltered to each angle before the resolver sees it.
pub fn analyze_at_angles(
    resolver: &ProbeResolver,
    ctx: &ObservationContext,
    angles: &[PositionAngle],
    asterism: &Asterism,
    tiptilt_group: &GuideProbeGroup,
    flexure_pool: &[CandidateStar],
    flexure_group: &GuideProbeGroup,
) -> Result<Vec<AssignmentResult>> {
    let tiptilt_stars = brightest_first(asterism.stars());
    let mut results = Vec::new();

    for &angle in angles {
        let flexure_stars = brightest_first(&filter_at_angle(
            resolver.validator(),
            ctx,
            flexure_pool,
            flexure_group,
            angle,
        ));

        for &order in probe_orders(tiptilt_group.kind()) {
            let request = AssignmentRequest {
                tiptilt_stars: &tiptilt_stars,
                tiptilt_group,
                flexure_stars: &flexure_stars,
                flexure_group,
                position_angle: angle,
                order,
            };
            if let Some(assignments) = resolver.resolve(ctx, &request)? {
                results.push(AssignmentResult::new(
                    angle,
                    tiptilt_group.kind(),
                    *asterism.strehl(),
                    assignments,
                ));
            }
        }
    }

    Ok(results)
}
