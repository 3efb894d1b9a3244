//! Result ranking and duplicate removal.

use ags_types::AssignmentResult;
use log::debug;

/// Sort best first and collapse results that rank equal.
///
/// Of each run of equally ranked results the one with the lexicographically
/// smallest probe mapping survives, so the output does not depend on the
/// order results were produced in. Ranking an already ranked list is a no-op.
pub fn rank_results(results: impl IntoIterator<Item = AssignmentResult>) -> Vec<AssignmentResult> {
    let mut ranked: Vec<AssignmentResult> = results.into_iter().collect();
    ranked.sort();
    ranked.reverse();
    ranked.dedup_by(|candidate, kept| candidate.rank_cmp(kept).is_eq());

    debug!("Ranked {} guide star results", ranked.len());
    for (i, result) in ranked.iter().enumerate() {
        debug!("result #{}: {}", i + 1, result);
    }
    ranked
}
