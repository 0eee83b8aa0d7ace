//! # vnscope-cli — Boundary Inspection Tool
//!
//! Provides the `vnscope` command-line interface over a static boundary
//! set (the same JSON file the API loads from `VNSCOPE_BOUNDARY_FILE`).
//!
//! ## Subcommands
//!
//! - `vnscope area`: surface area of a ward or province.
//! - `vnscope bbox`: bounding box and center.
//! - `vnscope mask`: outside-jurisdiction mask as JSON.
//! - `vnscope check-point`: whether a GPS position lies inside.
//! - `vnscope check-polygon`: whether a plot lies inside and is simple.
//! - `vnscope distance`: great-circle distance between two positions.
//!
//! ```bash
//! vnscope area --boundaries boundaries.json --level ward --code 19051
//! vnscope check-point --boundaries boundaries.json --level ward --code 19051 \
//!     --lat 21.03 --lng 105.84
//! ```

pub mod check;
pub mod inspect;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vnscope_boundary::StaticBoundaryProvider;
use vnscope_core::{BoundaryGeometry, BoundaryLevel};

/// Which boundary to operate on.
#[derive(Args, Debug, Clone)]
pub struct BoundaryArgs {
    /// Boundary set JSON file.
    #[arg(long, value_name = "FILE")]
    pub boundaries: PathBuf,

    /// Administrative level: `ward` or `province`.
    #[arg(long, value_parser = parse_level)]
    pub level: BoundaryLevel,

    /// Ward or province code.
    #[arg(long)]
    pub code: u32,
}

pub fn parse_level(raw: &str) -> Result<BoundaryLevel, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ward" => Ok(BoundaryLevel::Ward),
        "province" => Ok(BoundaryLevel::Province),
        other => Err(format!("unknown boundary level {other:?}, expected ward or province")),
    }
}

/// Load the selected boundary from its file.
pub fn load_boundary(args: &BoundaryArgs) -> Result<BoundaryGeometry> {
    let provider = StaticBoundaryProvider::from_file(&args.boundaries)
        .with_context(|| format!("failed to load {}", args.boundaries.display()))?;
    provider
        .get(args.level, args.code)
        .cloned()
        .with_context(|| {
            format!(
                "{} {} not found in {}",
                args.level,
                args.code,
                args.boundaries.display()
            )
        })
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
