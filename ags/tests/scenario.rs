use std::path::PathBuf;

use ags::scenario::Scenario;
use ags::{
    AgsConfig, AssignmentResult, GroupKind, GuideProbe, GuideStarAnalyzer, PositionAngle,
    StrehlThreshold,
};
use approx::assert_relative_eq;

fn scenario_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/gsaoi_field.json")
}

#[test]
fn test_recorded_field_selects_cwfs3_on_brightest() {
    let scenario = Scenario::load_from_file(&scenario_path()).unwrap();
    let config = AgsConfig::default();
    let validator = scenario.validator();
    let limits = config.magnitude_table();
    let search = scenario.search();
    let analyzer = GuideStarAnalyzer::new(&validator, &limits, &search);

    let results = analyzer
        .analyze(&scenario.context, &scenario.position_angles(), &scenario.catalog)
        .unwrap();

    assert_eq!(results.len(), 1);
    let best = &results[0];
    assert_eq!(best.position_angle, PositionAngle::ZERO);
    assert_eq!(best.tiptilt_group, GroupKind::Cwfs);
    assert_relative_eq!(best.strehl.avg, 0.31);

    let mapping: Vec<(&str, GuideProbe)> = best
        .assignments
        .iter()
        .map(|a| (a.star.id.as_str(), a.probe))
        .collect();
    assert_eq!(
        mapping,
        vec![
            ("A", GuideProbe::Cwfs3),
            ("B", GuideProbe::Cwfs1),
            ("C", GuideProbe::Cwfs2),
            ("F", GuideProbe::Odgw1),
        ]
    );
}

#[test]
fn test_early_termination_matches_exhaustive_on_recorded_field() {
    let scenario = Scenario::load_from_file(&scenario_path()).unwrap();
    let validator = scenario.validator();
    let limits = AgsConfig::default().magnitude_table();
    let search = scenario.search();
    let analyzer = GuideStarAnalyzer::new(&validator, &limits, &search);
    let angles = scenario.position_angles();

    let exhaustive = analyzer
        .analyze(&scenario.context, &angles, &scenario.catalog)
        .unwrap();
    let mut threshold = StrehlThreshold::new(0.3, None);
    let early = analyzer
        .analyze_early_termination(&scenario.context, &angles, &scenario.catalog, &mut threshold)
        .unwrap();

    assert_eq!(early, exhaustive);
}

#[test]
fn test_results_serialize_for_consumers() {
    let scenario = Scenario::load_from_file(&scenario_path()).unwrap();
    let validator = scenario.validator();
    let limits = AgsConfig::default().magnitude_table();
    let search = scenario.search();
    let results = GuideStarAnalyzer::new(&validator, &limits, &search)
        .analyze(&scenario.context, &scenario.position_angles(), &scenario.catalog)
        .unwrap();

    let json = serde_json::to_string(&results).unwrap();
    let parsed: Vec<AssignmentResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), results.len());
    assert_relative_eq!(parsed[0].strehl.avg, results[0].strehl.avg);
    assert_eq!(parsed[0].position_angle, results[0].position_angle);
    assert_eq!(parsed[0].probe_for("A"), Some(GuideProbe::Cwfs3));
    assert_eq!(parsed[0].flexure_assignment().unwrap().star.id, "F");
}
