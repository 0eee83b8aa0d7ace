//! # Inspection Subcommands
//!
//! `area`, `bbox`, `mask` and `distance`. All output is JSON on stdout.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use vnscope_boundary::MaskBuilder;
use vnscope_core::{
    distance_meters, polygon_area_sq_meters, BoundaryGeometry, BoundaryLevel, BoundingBox,
    GeoPoint, MaskGeometry,
};

use crate::{load_boundary, print_json, BoundaryArgs};

#[derive(Debug, Serialize)]
pub struct AreaReport {
    pub level: BoundaryLevel,
    pub code: u32,
    pub name: Option<String>,
    pub parts: usize,
    pub area_sq_meters: f64,
    pub area_sq_km: f64,
}

/// Total area over every part of the boundary, holes excluded.
pub fn area_report(boundary: &BoundaryGeometry) -> Result<AreaReport> {
    let mut area_sq_meters = 0.0;
    for part in &boundary.polygons {
        area_sq_meters += polygon_area_sq_meters(part)?;
    }
    Ok(AreaReport {
        level: boundary.level,
        code: boundary.code,
        name: boundary.name.clone(),
        parts: boundary.polygons.len(),
        area_sq_meters,
        area_sq_km: area_sq_meters / 1_000_000.0,
    })
}

pub fn run_area(args: &BoundaryArgs) -> Result<u8> {
    let boundary = load_boundary(args)?;
    print_json(&area_report(&boundary)?)?;
    Ok(0)
}

#[derive(Debug, Serialize)]
pub struct ExtentReport {
    pub bbox: BoundingBox,
    pub center: GeoPoint,
}

pub fn run_bbox(args: &BoundaryArgs) -> Result<u8> {
    let boundary = load_boundary(args)?;
    print_json(&ExtentReport {
        bbox: boundary.bbox,
        center: boundary.bbox.center(),
    })?;
    Ok(0)
}

#[derive(Args, Debug)]
pub struct MaskArgs {
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    /// Degrees of padding around the boundary's bounding box.
    #[arg(long)]
    pub padding: Option<f64>,
}

pub fn mask_for(boundary: &BoundaryGeometry, padding: Option<f64>) -> Option<MaskGeometry> {
    let builder = padding.map(MaskBuilder::with_padding).unwrap_or_default();
    builder.build(Some(boundary))
}

pub fn run_mask(args: &MaskArgs) -> Result<u8> {
    let boundary = load_boundary(&args.boundary)?;
    print_json(&mask_for(&boundary, args.padding))?;
    Ok(0)
}

#[derive(Args, Debug)]
pub struct DistanceArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub from_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub from_lng: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub to_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub to_lng: f64,
}

#[derive(Debug, Serialize)]
pub struct DistanceReport {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub meters: f64,
}

pub fn run_distance(args: &DistanceArgs) -> Result<u8> {
    let from = GeoPoint::new(args.from_lat, args.from_lng);
    let to = GeoPoint::new(args.to_lat, args.to_lng);
    from.validate()?;
    to.validate()?;
    print_json(&DistanceReport {
        from,
        to,
        meters: distance_meters(&from, &to),
    })?;
    Ok(0)
}
