//! # vnscope-core — Foundational Types for Jurisdiction-Scoped Access
//!
//! This crate is the leaf of the vnscope workspace. It defines the value
//! types every other crate passes around and the pure geometry kernel the
//! authorization layer relies on.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for administrative codes.** `ProvinceCode`,
//!    `WardCode` and `UserId` are validated at construction. No bare
//!    integers cross crate boundaries.
//!
//! 2. **`JurisdictionScope` is a closed enum.** Ward, province, national
//!    and unassigned scopes are distinct variants, so every decision
//!    branch is matched exhaustively. A ward scope without a ward code is
//!    unrepresentable.
//!
//! 3. **Boundary-inclusive containment.** A point exactly on a ring edge
//!    is inside. See [`geometry`] for the full policy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vnscope-*` crates.
//! - No I/O and no shared state.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod geo;
pub mod geometry;
pub mod identity;
pub mod scope;

pub use error::{GeometryError, ValidationError};
pub use geo::{BoundaryGeometry, BoundingBox, GeoPoint, GeoPolygon, MaskGeometry, Ring};
pub use geometry::{
    distance_meters, locate_point, point_in_boundary, point_in_polygon, polygon_area_sq_meters,
    polygon_in_boundary, polygon_inside_polygon, validate_simple_polygon, Location,
    EARTH_RADIUS_METERS,
};
pub use identity::{ProvinceCode, UserId, WardCode};
pub use scope::{BoundaryLevel, JurisdictionScope, Role, ScopeLevel, UserProfile};
