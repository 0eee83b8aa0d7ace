//! # Containment Subcommands
//!
//! `check-point` and `check-polygon` apply the same containment rules the
//! API uses for submissions: edges count as inside, a plot must fit inside
//! a single boundary part, and a plot must be simple with non-zero area.
//!
//! Exit code 0 when the geometry is accepted, 1 when it is not.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use vnscope_core::{
    point_in_boundary, polygon_area_sq_meters, polygon_in_boundary, validate_simple_polygon,
    BoundaryGeometry, GeoPoint, GeoPolygon,
};

use crate::{load_boundary, print_json, BoundaryArgs};

#[derive(Args, Debug)]
pub struct CheckPointArgs {
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct PointReport {
    pub point: GeoPoint,
    pub inside: bool,
}

pub fn run_check_point(args: &CheckPointArgs) -> Result<u8> {
    let boundary = load_boundary(&args.boundary)?;
    let point = GeoPoint::new(args.lat, args.lng);
    let inside = point_in_boundary(&point, &boundary)?;
    print_json(&PointReport { point, inside })?;
    Ok(if inside { 0 } else { 1 })
}

#[derive(Args, Debug)]
pub struct CheckPolygonArgs {
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    /// Plot polygon JSON: an array of rings of `{lat, lng}` points.
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PolygonReport {
    pub inside: bool,
    pub simple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sq_meters: Option<f64>,
}

impl PolygonReport {
    pub fn accepted(&self) -> bool {
        self.inside && self.simple
    }
}

/// Containment and simplicity of `polygon` against `boundary`.
pub fn polygon_report(polygon: &GeoPolygon, boundary: &BoundaryGeometry) -> Result<PolygonReport> {
    let inside = polygon_in_boundary(polygon, boundary)?;
    let (simple, error, area_sq_meters) = match validate_simple_polygon(polygon) {
        Ok(()) => (true, None, Some(polygon_area_sq_meters(polygon)?)),
        Err(e) => (false, Some(e.to_string()), None),
    };
    Ok(PolygonReport {
        inside,
        simple,
        error,
        area_sq_meters,
    })
}

pub fn run_check_polygon(args: &CheckPolygonArgs) -> Result<u8> {
    let boundary = load_boundary(&args.boundary)?;
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let polygon: GeoPolygon = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse polygon in {}", args.file.display()))?;

    let report = polygon_report(&polygon, &boundary)?;
    print_json(&report)?;
    Ok(if report.accepted() { 0 } else { 1 })
}
