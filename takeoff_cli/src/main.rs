//! # Takeoff CLI
//!
//! Loads a building file (or a built-in sample), runs the takeoff, and
//! prints the materials list.
//!
//! ```text
//! takeoff_cli [BUILDING.mbt] [--json] [--breakdown] [--save-sample PATH]
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=takeoff_core=debug` to see each
//! stage of the calculation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use takeoff_core::building::{BuildingDocument, OpeningSize, RollUpDoor, WallAssignment};
use takeoff_core::file_io::{load_building, save_building, BuildingFile};
use takeoff_core::{CalcResult, TakeoffEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Material takeoff for a pre-engineered metal building
#[derive(Parser, Debug)]
#[command(name = "takeoff_cli")]
#[command(about = "Material takeoff for a pre-engineered metal building", long_about = None)]
#[command(version)]
struct Cli {
    /// Building file (.mbt or bare building JSON); the sample shop when omitted
    #[arg(name = "BUILDING")]
    path: Option<PathBuf>,

    /// Print the takeoff as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print every intermediate quantity as JSON
    #[arg(long, conflicts_with = "json")]
    breakdown: bool,

    /// Write the sample building to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["BUILDING", "json", "breakdown"])]
    save_sample: Option<PathBuf>,
}

/// 40' x 40' x 12' shop with a center roll-up door on each gable wall
fn sample_building() -> BuildingDocument {
    let mut doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
    doc.man_doors.push(OpeningSize::new(3.0, 7.0));
    doc.roll_up_doors = vec![
        RollUpDoor::new(16.0, 10.0).at(12.0).on(WallAssignment::FrontGable),
        RollUpDoor::new(12.0, 10.0).at(14.0).on(WallAssignment::BackGable),
        RollUpDoor::new(10.0, 10.0).at(5.0).on(WallAssignment::Sidewall),
    ];
    doc.windows.push(OpeningSize::new(3.0, 3.0));
    doc
}

fn run(cli: &Cli) -> CalcResult<()> {
    if let Some(path) = &cli.save_sample {
        let file = BuildingFile::new(sample_building()).with_name("Sample shop");
        save_building(&file, path)?;
        println!("Saved sample building to {}", path.display());
        return Ok(());
    }

    let doc = match &cli.path {
        Some(path) => load_building(path)?.building,
        None => {
            info!("No building file given, using the sample building");
            sample_building()
        }
    };

    let engine = TakeoffEngine::new();
    if cli.breakdown {
        let breakdown = engine.breakdown(&doc);
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    let takeoff = engine.generate(&doc);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&takeoff)?);
    } else {
        print!("{}", takeoff.to_text());
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = run(&cli);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["takeoff_cli", "shop.mbt", "--json"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("shop.mbt")));
        assert!(cli.json);
        assert!(!cli.breakdown);

        let cli = Cli::try_parse_from(["takeoff_cli", "--save-sample", "out.mbt"]).unwrap();
        assert_eq!(cli.save_sample, Some(PathBuf::from("out.mbt")));
        assert_eq!(cli.path, None);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(Cli::try_parse_from(["takeoff_cli", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["takeoff_cli", "a.mbt", "b.mbt"]).is_err());
        assert!(Cli::try_parse_from(["takeoff_cli", "--save-sample"]).is_err());
        assert!(Cli::try_parse_from(["takeoff_cli", "--json", "--breakdown"]).is_err());
    }

    #[test]
    fn test_sample_building_is_valid() {
        let doc = sample_building();
        assert!(doc.validate().is_ok());
        let takeoff = TakeoffEngine::new().generate(&doc);
        assert_eq!(takeoff.quantity_of("Roll-Up Doors"), Some(3));
        assert_eq!(takeoff.quantity_of("Columns (I-beams)"), Some(6));
    }
}
