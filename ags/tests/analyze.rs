use ags::scenario::{PrecomputedSearch, TableValidator};
use ags::search::{AsterismCallback, SearchRequest};
use ags::{
    rank_results, AgsError, AssignmentResult, Asterism, AsterismSearch, Band, CandidateStar,
    CatalogSearchResults, GroupKind, GuideProbe, GuideProbeGroup, GuideStarAnalyzer, Instrument,
    NominalMagnitudeLimits, ObservationContext, PositionAngle, ProgressHandler, SearchControl,
    SearchError, SkyCoordinates, StrehlStats, StrehlThreshold, TiptiltFlexurePair,
};

const BOTH: [f64; 2] = [0.0, 90.0];

fn star(id: &str, r: f64) -> CandidateStar {
    CandidateStar::new(id, 10.0, -30.0).with_magnitude(Band::R, r)
}

fn pa(deg: f64) -> PositionAngle {
    PositionAngle::from_degrees(deg)
}

fn ctx() -> ObservationContext {
    ObservationContext::new(SkyCoordinates::new(10.0, -30.0), Instrument::Gsaoi {
        catalog_band: Some(Band::H),
    })
}

fn asterism(stars: &[CandidateStar], avg: f64) -> Asterism {
    Asterism::new(stars.to_vec(), StrehlStats::new(avg, 0.02, avg - 0.05, avg + 0.05)).unwrap()
}

fn cwfs_stars() -> Vec<CandidateStar> {
    vec![star("A", 10.0), star("B", 11.0), star("C", 12.0)]
}

fn cwfs_reach_everywhere(validator: TableValidator, ids: &[&str]) -> TableValidator {
    ids.iter().fold(validator, |v, id| {
        GuideProbeGroup::canopus()
            .members()
            .iter()
            .fold(v, |v, probe| v.allow(id, *probe, &BOTH))
    })
}

/// Three CWFS stars reachable by every arm at 0° and 90°, one ODGW flexure
/// star reachable only by odgw1 at 0°.
struct Fixture {
    validator: TableValidator,
    limits: NominalMagnitudeLimits,
    search: PrecomputedSearch,
    catalog: Vec<CatalogSearchResults>,
}

impl Fixture {
    fn new() -> Self {
        let validator = cwfs_reach_everywhere(TableValidator::new(), &["A", "B", "C"])
            .allow("F", GuideProbe::Odgw1, &[0.0]);
        Self {
            validator,
            limits: NominalMagnitudeLimits::canopus(),
            search: PrecomputedSearch::default()
                .with(GroupKind::Cwfs, asterism(&cwfs_stars(), 0.4)),
            catalog: vec![
                CatalogSearchResults::new(GuideProbeGroup::canopus(), cwfs_stars()),
                CatalogSearchResults::new(GuideProbeGroup::gsaoi_odgw(), vec![star("F", 13.0)]),
            ],
        }
    }

    fn analyzer(&self) -> GuideStarAnalyzer<'_> {
        GuideStarAnalyzer::new(&self.validator, &self.limits, &self.search)
    }
}

#[test]
fn test_three_cwfs_stars_give_one_result_at_zero() {
    let fixture = Fixture::new();
    let results = fixture
        .analyzer()
        .analyze(&ctx(), &[pa(0.0), pa(90.0)], &fixture.catalog)
        .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.position_angle, PositionAngle::ZERO);
    assert_eq!(result.tiptilt_group, GroupKind::Cwfs);
    assert_eq!(result.probe_for("A"), Some(GuideProbe::Cwfs3));
    assert_eq!(result.flexure_assignment().unwrap().probe, GuideProbe::Odgw1);
    assert_eq!(result.assignments.len(), 4);
    assert!(result.has_distinct_probes());
}

#[test]
fn test_angle_order_does_not_change_results() {
    let mut fixture = Fixture::new();
    fixture.validator = fixture.validator.allow("F", GuideProbe::Odgw2, &[90.0]);
    fixture.search = fixture
        .search
        .with(GroupKind::Cwfs, asterism(&cwfs_stars()[..2], 0.3));

    let analyzer = fixture.analyzer();
    let forward = analyzer
        .analyze(&ctx(), &[pa(0.0), pa(90.0)], &fixture.catalog)
        .unwrap();
    let backward = analyzer
        .analyze(&ctx(), &[pa(90.0), pa(0.0)], &fixture.catalog)
        .unwrap();

    assert_eq!(forward.len(), 4);
    assert_eq!(forward, backward);
}

#[test]
fn test_every_result_uses_distinct_probes() {
    let mut fixture = Fixture::new();
    fixture.validator = fixture.validator.allow("F", GuideProbe::Odgw2, &[90.0]);
    fixture.search = fixture
        .search
        .with(GroupKind::Cwfs, asterism(&cwfs_stars()[1..], 0.35))
        .with(GroupKind::Cwfs, asterism(&cwfs_stars()[2..], 0.2));

    let results = fixture
        .analyzer()
        .analyze(&ctx(), &[pa(0.0), pa(90.0)], &fixture.catalog)
        .unwrap();

    assert!(!results.is_empty());
    for result in &results {
        assert!(result.has_distinct_probes(), "{result}");
        assert_eq!(result.assignments.len(), result.tiptilt_assignments().len() + 1);
    }
    // Best first
    for window in results.windows(2) {
        assert!(window[0] > window[1]);
    }
}

#[test]
fn test_ranking_analyze_output_again_changes_nothing() {
    let mut fixture = Fixture::new();
    fixture.validator = fixture.validator.allow("F", GuideProbe::Odgw3, &[90.0]);
    fixture.search = fixture
        .search
        .with(GroupKind::Cwfs, asterism(&cwfs_stars()[..2], 0.3));

    let results = fixture
        .analyzer()
        .analyze(&ctx(), &[pa(0.0), pa(90.0)], &fixture.catalog)
        .unwrap();
    assert_eq!(rank_results(results.clone()), results);
}

#[test]
fn test_single_odgw_star_never_yields_results() {
    let validator = TableValidator::new()
        .allow("O", GuideProbe::Odgw1, &BOTH)
        .allow("G", GuideProbe::Cwfs3, &BOTH);
    let limits = NominalMagnitudeLimits::canopus();
    let search =
        PrecomputedSearch::default().with(GroupKind::Odgw, asterism(&[star("O", 12.0)], 0.5));
    let catalog = vec![
        CatalogSearchResults::new(GuideProbeGroup::gsaoi_odgw(), vec![star("O", 12.0)]),
        CatalogSearchResults::new(GuideProbeGroup::canopus(), vec![star("G", 13.0)]),
    ];

    let results = GuideStarAnalyzer::new(&validator, &limits, &search)
        .analyze(&ctx(), &[pa(0.0), pa(90.0)], &catalog)
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_odgw_tiptilt_forces_flexure_onto_cwfs3() {
    let validator = TableValidator::new()
        .allow("O1", GuideProbe::Odgw1, &BOTH)
        .allow("O2", GuideProbe::Odgw3, &BOTH)
        .allow("G", GuideProbe::Cwfs1, &BOTH)
        .allow("G", GuideProbe::Cwfs2, &BOTH)
        .allow("G", GuideProbe::Cwfs3, &[0.0]);
    let limits = NominalMagnitudeLimits::canopus();
    let odgw_stars = vec![star("O1", 12.0), star("O2", 12.5)];
    let search = PrecomputedSearch::default().with(GroupKind::Odgw, asterism(&odgw_stars, 0.5));
    let catalog = vec![
        CatalogSearchResults::new(GuideProbeGroup::gsaoi_odgw(), odgw_stars),
        CatalogSearchResults::new(GuideProbeGroup::canopus(), vec![star("G", 13.0)]),
    ];

    let results = GuideStarAnalyzer::new(&validator, &limits, &search)
        .analyze(&ctx(), &[pa(0.0), pa(90.0)], &catalog)
        .unwrap();

    // At 90° only cwfs1/cwfs2 reach G, which does not count
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.tiptilt_group, GroupKind::Odgw);
    assert_eq!(result.position_angle, PositionAngle::ZERO);
    assert_eq!(result.probe_for("O1"), Some(GuideProbe::Odgw1));
    assert_eq!(result.probe_for("O2"), Some(GuideProbe::Odgw3));
    assert_eq!(result.flexure_assignment().unwrap().probe, GuideProbe::Cwfs3);
}

#[test]
fn test_missing_flexure_capability_is_fatal_in_both_modes() {
    let validator = TableValidator::new()
        .allow("O1", GuideProbe::Odgw1, &BOTH)
        .allow("O2", GuideProbe::Odgw2, &BOTH)
        .allow("G", GuideProbe::Cwfs1, &BOTH)
        .without_capability(GuideProbe::Cwfs3);
    let limits = NominalMagnitudeLimits::none();
    let odgw_stars = vec![star("O1", 12.0), star("O2", 12.5)];
    let search = PrecomputedSearch::default().with(GroupKind::Odgw, asterism(&odgw_stars, 0.5));
    let catalog = vec![
        CatalogSearchResults::new(GuideProbeGroup::gsaoi_odgw(), odgw_stars),
        CatalogSearchResults::new(GuideProbeGroup::canopus(), vec![star("G", 13.0)]),
    ];
    let analyzer = GuideStarAnalyzer::new(&validator, &limits, &search);

    assert!(matches!(
        analyzer.analyze(&ctx(), &[pa(0.0)], &catalog),
        Err(AgsError::MissingCapability(GuideProbe::Cwfs3))
    ));

    let mut handler = StrehlThreshold::new(0.9, None);
    assert!(matches!(
        analyzer.analyze_early_termination(&ctx(), &[pa(0.0)], &catalog, &mut handler),
        Err(AgsError::MissingCapability(GuideProbe::Cwfs3))
    ));
}

#[test]
fn test_no_angles_is_fatal() {
    let fixture = Fixture::new();
    assert!(matches!(
        fixture.analyzer().analyze(&ctx(), &[], &fixture.catalog),
        Err(AgsError::NoPositionAngles)
    ));
}

#[test]
fn test_unsupported_pair_is_fatal() {
    let err = TiptiltFlexurePair::new(
        CatalogSearchResults::new(GuideProbeGroup::gsaoi_odgw(), vec![star("O", 12.0)]),
        CatalogSearchResults::new(GuideProbeGroup::gsaoi_odgw(), vec![star("P", 12.0)]),
    )
    .unwrap_err();
    assert!(matches!(err, AgsError::UnsupportedGroupPair { .. }));
}

struct BrokenSearch;

impl AsterismSearch for BrokenSearch {
    fn search(
        &self,
        _request: &SearchRequest,
        _on_asterism: &mut AsterismCallback,
    ) -> Result<Vec<Asterism>, SearchError> {
        Err(SearchError::Failed("catalog offline".to_string()))
    }
}

struct CancelledSearch;

impl AsterismSearch for CancelledSearch {
    fn search(
        &self,
        _request: &SearchRequest,
        _on_asterism: &mut AsterismCallback,
    ) -> Result<Vec<Asterism>, SearchError> {
        Err(SearchError::Cancelled)
    }
}

#[test]
fn test_search_failure_propagates_but_cancellation_does_not() {
    let fixture = Fixture::new();

    let analyzer = GuideStarAnalyzer::new(&fixture.validator, &fixture.limits, &BrokenSearch);
    assert!(matches!(
        analyzer.analyze(&ctx(), &[pa(0.0)], &fixture.catalog),
        Err(AgsError::Search(SearchError::Failed(_)))
    ));

    let analyzer = GuideStarAnalyzer::new(&fixture.validator, &fixture.limits, &CancelledSearch);
    let results = analyzer
        .analyze(&ctx(), &[pa(0.0)], &fixture.catalog)
        .unwrap();
    assert!(results.is_empty());
}

/// Delivers one asterism for its group, then stops as if the user cancelled.
struct DeliverThenCancel(GroupKind, Asterism);

impl AsterismSearch for DeliverThenCancel {
    fn search(
        &self,
        request: &SearchRequest,
        on_asterism: &mut AsterismCallback,
    ) -> Result<Vec<Asterism>, SearchError> {
        if request.group.kind() == self.0 {
            on_asterism(&self.1, 1, 2)?;
        }
        Err(SearchError::Cancelled)
    }
}

#[test]
fn test_cancelled_search_keeps_delivered_asterisms_in_both_modes() {
    let fixture = Fixture::new();
    let search = DeliverThenCancel(GroupKind::Cwfs, asterism(&cwfs_stars(), 0.4));
    let analyzer = GuideStarAnalyzer::new(&fixture.validator, &fixture.limits, &search);
    let angles = [pa(0.0), pa(90.0)];

    let exhaustive = analyzer.analyze(&ctx(), &angles, &fixture.catalog).unwrap();
    assert_eq!(exhaustive.len(), 1);
    assert_eq!(exhaustive[0].position_angle, PositionAngle::ZERO);
    assert_eq!(exhaustive[0].probe_for("A"), Some(GuideProbe::Cwfs3));

    let mut threshold = StrehlThreshold::new(0.9, None);
    let early = analyzer
        .analyze_early_termination(&ctx(), &angles, &fixture.catalog, &mut threshold)
        .unwrap();
    assert_eq!(early, exhaustive);
}

#[derive(Default)]
struct Recorder {
    titles: Vec<String>,
    calls: Vec<(usize, usize, bool)>,
}

impl ProgressHandler for Recorder {
    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_string());
    }

    fn progress(
        &mut self,
        _asterism: &Asterism,
        count: usize,
        total: usize,
        used: bool,
    ) -> Result<SearchControl, SearchError> {
        self.calls.push((count, total, used));
        Ok(SearchControl::GoodEnough)
    }
}

#[test]
fn test_early_termination_reports_every_asterism() {
    let mut fixture = Fixture::new();
    // Only reachable by cwfs1, so never part of a valid asterism
    fixture.validator = fixture.validator.allow("D", GuideProbe::Cwfs1, &BOTH);
    fixture.catalog[0].stars.push(star("D", 10.5));
    fixture.search = fixture
        .search
        .with(GroupKind::Cwfs, asterism(&[star("D", 10.5)], 0.3));

    let mut recorder = Recorder::default();
    let results = fixture
        .analyzer()
        .analyze_early_termination(&ctx(), &[pa(0.0), pa(90.0)], &fixture.catalog, &mut recorder)
        .unwrap();

    assert_eq!(
        recorder.titles,
        vec![
            "Finding asterisms for CWFS".to_string(),
            "Finding asterisms for ODGW".to_string()
        ]
    );
    assert_eq!(recorder.calls, vec![(1, 2, true), (2, 2, false)]);
    assert_eq!(results.len(), 1);
}

#[test]
fn test_cancellation_keeps_partial_results() {
    let mut fixture = Fixture::new();
    fixture.search = fixture
        .search
        .with(GroupKind::Cwfs, asterism(&cwfs_stars()[..2], 0.3));
    let angles = [pa(0.0), pa(90.0)];

    let exhaustive = fixture
        .analyzer()
        .analyze(&ctx(), &angles, &fixture.catalog)
        .unwrap();
    assert_eq!(exhaustive.len(), 2);

    let mut threshold = StrehlThreshold::new(0.35, None);
    let early: Vec<AssignmentResult> = fixture
        .analyzer()
        .analyze_early_termination(&ctx(), &angles, &fixture.catalog, &mut threshold)
        .unwrap();
    assert_eq!(threshold.used(), 1);
    assert_eq!(early.len(), 1);
    assert_eq!(early[0], exhaustive[0]);
}
