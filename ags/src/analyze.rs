//! The two public entry points: exhaustive analysis and early-termination
//! analysis of paired catalog results.

use std::collections::BTreeSet;

use ags_types::{
    AssignmentResult, Asterism, CandidateStar, GuideProbeGroup, PositionAngle,
};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::angles::analyze_at_angles;
use crate::bandpass::{select_bandpass, strehl_factor};
use crate::capability::{MagnitudeLimitTable, ProbeValidator};
use crate::context::ObservationContext;
use crate::error::{AgsError, Result};
use crate::filter::filter_any_angle;
use crate::pairing::{CatalogSearchResults, TiptiltFlexurePair};
use crate::ranking::rank_results;
use crate::resolver::ProbeResolver;
use crate::search::{AsterismSearch, ProgressHandler, SearchControl, SearchError, SearchRequest};

/// Requested angles as a set, in ascending order
fn requested_angles(angles: &[PositionAngle]) -> Result<Vec<PositionAngle>> {
    let unique: BTreeSet<PositionAngle> = angles.iter().copied().collect();
    if unique.is_empty() {
        return Err(AgsError::NoPositionAngles);
    }
    Ok(unique.into_iter().collect())
}

/// A tip-tilt/flexure pair with both pools filtered to the requested angles.
struct PreparedPair<'p> {
    tiptilt_group: &'p GuideProbeGroup,
    flexure_group: &'p GuideProbeGroup,
    tiptilt_pool: Vec<CandidateStar>,
    flexure_pool: Vec<CandidateStar>,
}

impl PreparedPair<'_> {
    fn title(&self) -> String {
        format!("Finding asterisms for {}", self.tiptilt_group.kind())
    }

    fn search_request(&self, ctx: &ObservationContext) -> SearchRequest<'_> {
        SearchRequest {
            group: self.tiptilt_group,
            pool: &self.tiptilt_pool,
            base: ctx.base,
            band: select_bandpass(self.tiptilt_group.kind(), &ctx.instrument),
            strehl_factor: strehl_factor(Some(ctx)),
        }
    }
}

/// Guide star asterism analysis over a validation capability, a magnitude
/// limit table and an asterism search.
#[derive(Clone, Copy)]
pub struct GuideStarAnalyzer<'a> {
    resolver: ProbeResolver<'a>,
    search: &'a dyn AsterismSearch,
}

impl<'a> GuideStarAnalyzer<'a> {
    pub fn new(
        validator: &'a dyn ProbeValidator,
        limits: &'a dyn MagnitudeLimitTable,
        search: &'a dyn AsterismSearch,
    ) -> Self {
        Self {
            resolver: ProbeResolver::new(validator, limits),
            search,
        }
    }

    pub fn resolver(&self) -> &ProbeResolver<'a> {
        &self.resolver
    }

    /// Run every search to completion and rank all valid assignments, best
    /// first. Pairs are evaluated in parallel.
    ///
    /// A cancelled search still contributes the asterisms it delivered before
    /// stopping; any other search failure or configuration error aborts the
    /// analysis.
    pub fn analyze(
        &self,
        ctx: &ObservationContext,
        angles: &[PositionAngle],
        results: &[CatalogSearchResults],
    ) -> Result<Vec<AssignmentResult>> {
        let angles = requested_angles(angles)?;
        let pairs = TiptiltFlexurePair::pairs(results);

        let found = pairs
            .par_iter()
            .map(|pair| self.analyze_pair(ctx, &angles, pair))
            .collect::<Result<Vec<_>>>()?;

        Ok(rank_results(found.into_iter().flatten()))
    }

    /// Resolve asterisms as the search delivers them, letting `progress`
    /// stop a search once results are good enough.
    ///
    /// Cancellation ends the current pair's search but keeps everything
    /// accumulated so far; the remaining pairs are still searched.
    pub fn analyze_early_termination(
        &self,
        ctx: &ObservationContext,
        angles: &[PositionAngle],
        results: &[CatalogSearchResults],
        progress: &mut dyn ProgressHandler,
    ) -> Result<Vec<AssignmentResult>> {
        let angles = requested_angles(angles)?;
        let mut found = Vec::new();

        for pair in TiptiltFlexurePair::pairs(results) {
            let Some(prepared) = self.prepare(ctx, &angles, &pair) else {
                continue;
            };
            let title = prepared.title();
            info!("{title}");
            progress.set_title(&title);

            let request = prepared.search_request(ctx);
            let mut handler = EarlyTerminationHandler {
                resolver: self.resolver,
                ctx,
                angles: &angles,
                tiptilt_group: prepared.tiptilt_group,
                flexure_group: prepared.flexure_group,
                flexure_pool: &prepared.flexure_pool,
                progress: &mut *progress,
                results: Vec::new(),
                fatal: None,
            };
            let outcome = self
                .search
                .search(&request, &mut |asterism: &Asterism, count: usize, total: usize| {
                    handler.on_asterism(asterism, count, total)
                });
            found.extend(handler.finish(outcome)?);
        }

        Ok(rank_results(found))
    }

    fn prepare<'p>(
        &self,
        ctx: &ObservationContext,
        angles: &[PositionAngle],
        pair: &'p TiptiltFlexurePair,
    ) -> Option<PreparedPair<'p>> {
        let validator = self.resolver.validator();
        let tiptilt_group = &pair.tiptilt().group;
        let flexure_group = &pair.flexure().group;
        let tiptilt_pool =
            filter_any_angle(validator, ctx, &pair.tiptilt().stars, tiptilt_group, angles);
        let flexure_pool =
            filter_any_angle(validator, ctx, &pair.flexure().stars, flexure_group, angles);

        if tiptilt_pool.is_empty() || flexure_pool.is_empty() {
            debug!(
                "Skipping {} tip-tilt with {} flexure: {} tip-tilt and {} flexure candidates",
                tiptilt_group.kind(),
                flexure_group.kind(),
                tiptilt_pool.len(),
                flexure_pool.len()
            );
            return None;
        }

        Some(PreparedPair {
            tiptilt_group,
            flexure_group,
            tiptilt_pool,
            flexure_pool,
        })
    }

    fn analyze_pair(
        &self,
        ctx: &ObservationContext,
        angles: &[PositionAngle],
        pair: &TiptiltFlexurePair,
    ) -> Result<Vec<AssignmentResult>> {
        let Some(prepared) = self.prepare(ctx, angles, pair) else {
            return Ok(Vec::new());
        };
        info!("{}", prepared.title());

        let mut delivered = Vec::new();
        let mut collect =
            |asterism: &Asterism, _: usize, _: usize| -> std::result::Result<SearchControl, SearchError> {
                delivered.push(asterism.clone());
                Ok(SearchControl::Continue)
            };
        let asterisms = match self
            .search
            .search(&prepared.search_request(ctx), &mut collect)
        {
            Ok(asterisms) => asterisms,
            Err(SearchError::Cancelled) => {
                warn!(
                    "Asterism search for {} was cancelled after {} asterisms",
                    prepared.tiptilt_group.kind(),
                    delivered.len()
                );
                delivered
            }
            Err(e) => return Err(e.into()),
        };

        let mut results = Vec::new();
        for asterism in &asterisms {
            results.extend(analyze_at_angles(
                &self.resolver,
                ctx,
                angles,
                asterism,
                prepared.tiptilt_group,
                &prepared.flexure_pool,
                prepared.flexure_group,
            )?);
        }
        Ok(results)
    }
}

/// Per-pair callback state for early-termination mode.
///
/// The search calls [`EarlyTerminationHandler::on_asterism`] once per
/// asterism; the handler resolves it at every angle, keeps what it finds and
/// forwards the outcome to the caller's [`ProgressHandler`]. A configuration
/// error stops the search and is reported by [`EarlyTerminationHandler::finish`].
pub struct EarlyTerminationHandler<'h, 'a> {
    resolver: ProbeResolver<'a>,
    ctx: &'h ObservationContext,
    angles: &'h [PositionAngle],
    tiptilt_group: &'h GuideProbeGroup,
    flexure_group: &'h GuideProbeGroup,
    flexure_pool: &'h [CandidateStar],
    progress: &'h mut dyn ProgressHandler,
    results: Vec<AssignmentResult>,
    fatal: Option<AgsError>,
}

impl EarlyTerminationHandler<'_, '_> {
    pub fn on_asterism(
        &mut self,
        asterism: &Asterism,
        count: usize,
        total: usize,
    ) -> std::result::Result<SearchControl, SearchError> {
        if self.fatal.is_some() {
            return Err(SearchError::Cancelled);
        }
        match analyze_at_angles(
            &self.resolver,
            self.ctx,
            self.angles,
            asterism,
            self.tiptilt_group,
            self.flexure_pool,
            self.flexure_group,
        ) {
            Ok(found) => {
                let used = !found.is_empty();
                self.results.extend(found);
                self.progress.progress(asterism, count, total, used)
            }
            Err(e) => {
                self.fatal = Some(e);
                Err(SearchError::Cancelled)
            }
        }
    }

    /// Results accumulated so far, given how the search ended.
    pub fn finish(
        self,
        outcome: std::result::Result<Vec<Asterism>, SearchError>,
    ) -> Result<Vec<AssignmentResult>> {
        if let Some(e) = self.fatal {
            return Err(e);
        }
        match outcome {
            Ok(_) => {}
            Err(SearchError::Cancelled) => debug!(
                "{} search cancelled with {} results",
                self.tiptilt_group.kind(),
                self.results.len()
            ),
            Err(e) => return Err(e.into()),
        }
        Ok(self.results)
    }
}
