//! Guide star asterism selection for a recorded scenario
//!
//! Loads a scenario file (observation context, catalog candidates, recorded
//! asterisms and probe reach table), runs the selection engine over it and
//! prints the ranked probe assignments.

use std::path::PathBuf;

use ags::config::EarlyTerminationConfig;
use ags::scenario::Scenario;
use ags::{AgsConfig, AssignmentResult, ConfigStorage, GuideStarAnalyzer, PositionAngle};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ags_select",
    about = "Selects and ranks guide star asterisms and probe assignments",
    long_about = None
)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Configuration file (defaults to ~/.cf_config/ags_config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Position angles in degrees, overriding the scenario and configuration
    /// Example: --angles 0,90,180,270
    #[arg(long, value_delimiter = ',')]
    angles: Option<Vec<f64>>,

    /// Stop each asterism search once results are good enough
    #[arg(long)]
    early_termination: bool,

    /// Average Strehl considered good enough in early-termination mode
    #[arg(long)]
    min_strehl: Option<f64>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<AgsConfig> {
    match path {
        Some(path) => AgsConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match ConfigStorage::new() {
            Ok(storage) => storage
                .load_or_default()
                .context("Failed to load stored config"),
            Err(_) => Ok(AgsConfig::default()),
        },
    }
}

fn print_table(results: &[AssignmentResult]) {
    println!(
        "{:>4} {:>8} {:>6} {:>7} {:>7} {:>7} {:>7}  Assignments",
        "#", "PA", "Group", "Avg", "RMS", "Min", "Max"
    );
    for (i, result) in results.iter().enumerate() {
        let assignments: Vec<String> = result.assignments.iter().map(|a| a.to_string()).collect();
        println!(
            "{:>4} {:>8.1} {:>6} {:>7.3} {:>7.3} {:>7.3} {:>7.3}  {}",
            i + 1,
            result.position_angle.degrees(),
            result.tiptilt_group.to_string(),
            result.strehl.avg,
            result.strehl.rms,
            result.strehl.min,
            result.strehl.max,
            assignments.join(", ")
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let scenario = Scenario::load_from_file(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;

    let angles: Vec<PositionAngle> = match &args.angles {
        Some(degrees) => degrees.iter().map(|&d| PositionAngle::from_degrees(d)).collect(),
        None if !scenario.position_angles_deg.is_empty() => scenario.position_angles(),
        None => config.position_angles(),
    };

    let validator = scenario.validator();
    let limits = config.magnitude_table();
    let search = scenario.search();
    let analyzer = GuideStarAnalyzer::new(&validator, &limits, &search);

    let results = if args.early_termination {
        let settings = match (args.min_strehl, config.early_termination) {
            (Some(min_average_strehl), configured) => EarlyTerminationConfig {
                min_average_strehl,
                max_used_asterisms: configured.and_then(|c| c.max_used_asterisms),
            },
            (None, Some(configured)) => configured,
            (None, None) => anyhow::bail!(
                "--early-termination needs --min-strehl or an early_termination config section"
            ),
        };
        let mut handler = settings.handler();
        analyzer.analyze_early_termination(
            &scenario.context,
            &angles,
            &scenario.catalog,
            &mut handler,
        )?
    } else {
        analyzer.analyze(&scenario.context, &angles, &scenario.catalog)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No valid guide star configuration found");
    } else {
        print_table(&results);
    }

    Ok(())
}
