//! # Outside-Jurisdiction Mask
//!
//! The mask is the plane minus the allowed region: a rectangle padded well
//! beyond the boundary's extent, with the exterior ring of every boundary
//! part carved out as a hole. Ring orientation follows RFC 7946 (exterior
//! counter-clockwise, holes clockwise) regardless of how the provider
//! wound its rings.
//!
//! Holes inside a boundary part (enclaves) are not re-filled; a single
//! polygon cannot nest a ring inside a hole.

use vnscope_core::{BoundaryGeometry, MaskGeometry, Ring};

/// Default padding around the boundary extent, in degrees.
pub const MASK_PADDING_DEGREES: f64 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct MaskBuilder {
    padding_degrees: f64,
}

impl Default for MaskBuilder {
    fn default() -> Self {
        Self {
            padding_degrees: MASK_PADDING_DEGREES,
        }
    }
}

impl MaskBuilder {
    pub fn with_padding(padding_degrees: f64) -> Self {
        Self { padding_degrees }
    }

    /// Mask for `boundary`; `None` when there is no boundary (national scope).
    pub fn build(&self, boundary: Option<&BoundaryGeometry>) -> Option<MaskGeometry> {
        let boundary = boundary?;
        let exterior = counter_clockwise(boundary.bbox.padded(self.padding_degrees).ring());
        let holes = boundary
            .polygons
            .iter()
            .filter_map(|part| part.exterior())
            .map(|ring| clockwise(ring.closed()))
            .collect();
        Some(MaskGeometry::new(exterior, holes))
    }
}

/// Mask with the default padding.
pub fn build_mask(boundary: Option<&BoundaryGeometry>) -> Option<MaskGeometry> {
    MaskBuilder::default().build(boundary)
}

fn counter_clockwise(ring: Ring) -> Ring {
    if ring.signed_area_deg() < 0.0 {
        ring.reversed()
    } else {
        ring
    }
}

fn clockwise(ring: Ring) -> Ring {
    if ring.signed_area_deg() > 0.0 {
        ring.reversed()
    } else {
        ring
    }
}
