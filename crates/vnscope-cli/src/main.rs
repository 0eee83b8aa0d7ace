//! # vnscope CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vnscope_cli::check::{run_check_point, run_check_polygon, CheckPointArgs, CheckPolygonArgs};
use vnscope_cli::inspect::{run_area, run_bbox, run_distance, run_mask, DistanceArgs, MaskArgs};
use vnscope_cli::BoundaryArgs;

/// Inspect jurisdiction boundaries and test geometry against them.
#[derive(Parser, Debug)]
#[command(name = "vnscope", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Surface area of a boundary in square meters and square kilometers.
    Area(BoundaryArgs),

    /// Bounding box and center of a boundary.
    Bbox(BoundaryArgs),

    /// Mask geometry covering everything outside a boundary.
    Mask(MaskArgs),

    /// Whether a GPS position lies inside a boundary (edges inclusive).
    CheckPoint(CheckPointArgs),

    /// Whether a plot polygon lies inside a boundary and is simple.
    CheckPolygon(CheckPolygonArgs),

    /// Great-circle distance between two positions.
    Distance(DistanceArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Area(args) => run_area(&args),
        Commands::Bbox(args) => run_bbox(&args),
        Commands::Mask(args) => run_mask(&args),
        Commands::CheckPoint(args) => run_check_point(&args),
        Commands::CheckPolygon(args) => run_check_polygon(&args),
        Commands::Distance(args) => run_distance(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
