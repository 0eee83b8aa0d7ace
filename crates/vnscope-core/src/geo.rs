//! # Geographic Value Types
//!
//! WGS84 points, rings, polygons, bounding boxes, and the two derived
//! geometries the presentation layer consumes: [`BoundaryGeometry`] and
//! [`MaskGeometry`].
//!
//! ## Ring Conventions
//!
//! Polygons are ordered rings: the first ring is the outer boundary and
//! any subsequent rings are holes. Planar orientation is computed with
//! longitude as x and latitude as y, so a counter-clockwise ring has a
//! positive signed area. Mask geometries follow RFC 7946: exterior
//! counter-clockwise, holes clockwise.
//!
//! Deserialization of rings and polygons is structural only. Provider data
//! may arrive with open rings; the [`crate::geometry`] kernel treats an
//! open ring as implicitly closed and validates before computing anything.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::scope::BoundaryLevel;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates are finite and inside the WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// [`Self::is_valid`] as a `Result`.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeometryError::NonFiniteCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

/// A sequence of vertices forming one ring of a polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(Vec<GeoPoint>);

impl Ring {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    /// All points as stored, including a closing duplicate if present.
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Whether the first and last points coincide.
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }

    /// The vertex list without the closing duplicate.
    pub fn vertices(&self) -> &[GeoPoint] {
        if self.is_closed() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    /// Return a copy whose last point repeats the first.
    pub fn closed(&self) -> Self {
        let mut points = self.0.clone();
        if !self.is_closed() {
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
        }
        Self(points)
    }

    /// Return a copy with the vertex order reversed.
    pub fn reversed(&self) -> Self {
        let mut points = self.0.clone();
        points.reverse();
        Self(points)
    }

    /// Shoelace signed area in square degrees (lng = x, lat = y).
    /// Positive for counter-clockwise rings.
    pub fn signed_area_deg(&self) -> f64 {
        let v = self.vertices();
        let n = v.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let a = v[i];
            let b = v[(i + 1) % n];
            twice += a.lng * b.lat - b.lng * a.lat;
        }
        twice / 2.0
    }

    /// Tight bounding box, or `None` for an empty ring.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.0.iter())
    }
}

impl From<Vec<GeoPoint>> for Ring {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }
}

/// A polygon: exterior ring followed by zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoPolygon {
    rings: Vec<Ring>,
}

impl GeoPolygon {
    /// Build a polygon, requiring every ring to be closed with at least
    /// four points and valid coordinates.
    ///
    /// # Errors
    ///
    /// [`GeometryError::EmptyGeometry`] when `rings` is empty,
    /// [`GeometryError::RingNotClosed`], [`GeometryError::TooFewVertices`],
    /// or [`GeometryError::NonFiniteCoordinate`] for a malformed ring.
    pub fn new(rings: Vec<Ring>) -> Result<Self, GeometryError> {
        if rings.is_empty() {
            return Err(GeometryError::EmptyGeometry);
        }
        for ring in &rings {
            if !ring.is_closed() {
                return Err(GeometryError::RingNotClosed);
            }
            if ring.points().len() < 4 {
                return Err(GeometryError::TooFewVertices {
                    distinct: ring.vertices().len(),
                });
            }
            for p in ring.points() {
                p.validate()?;
            }
        }
        Ok(Self { rings })
    }

    /// Build a polygon from structurally trusted rings without checks.
    ///
    /// Kernel operations still validate before use.
    pub fn from_rings(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Convenience for a hole-free polygon; the ring is closed if needed.
    pub fn from_exterior(points: Vec<GeoPoint>) -> Result<Self, GeometryError> {
        Self::new(vec![Ring::new(points).closed()])
    }

    /// Axis-aligned rectangle as a closed counter-clockwise polygon.
    pub fn rectangle(bbox: &BoundingBox) -> Self {
        Self {
            rings: vec![bbox.ring()],
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Copy with every ring's winding reversed.
    pub fn reversed(&self) -> Self {
        Self {
            rings: self.rings.iter().map(Ring::reversed).collect(),
        }
    }

    /// Bounding box of the exterior ring.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.exterior().and_then(Ring::bbox)
    }
}

/// Rectangular extent in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Tight box around the given points; `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self {
            north: first.lat,
            south: first.lat,
            east: first.lng,
            west: first.lng,
        };
        for p in iter {
            bbox.north = bbox.north.max(p.lat);
            bbox.south = bbox.south.min(p.lat);
            bbox.east = bbox.east.max(p.lng);
            bbox.west = bbox.west.min(p.lng);
        }
        Some(bbox)
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }

    /// Inclusive containment.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lng <= self.east
            && point.lng >= self.west
    }

    /// Grow by `degrees` on every side, clamped to the WGS84 range.
    pub fn padded(&self, degrees: f64) -> Self {
        Self {
            north: (self.north + degrees).min(90.0),
            south: (self.south - degrees).max(-90.0),
            east: (self.east + degrees).min(180.0),
            west: (self.west - degrees).max(-180.0),
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Closed counter-clockwise ring tracing the box.
    pub fn ring(&self) -> Ring {
        Ring::new(vec![
            GeoPoint::new(self.south, self.west),
            GeoPoint::new(self.south, self.east),
            GeoPoint::new(self.north, self.east),
            GeoPoint::new(self.north, self.west),
            GeoPoint::new(self.south, self.west),
        ])
    }
}

/// Authoritative extent of one ward or province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryGeometry {
    pub level: BoundaryLevel,
    pub code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bbox: BoundingBox,
    /// One entry per disjoint part (a single polygon for most wards).
    pub polygons: Vec<GeoPolygon>,
}

impl BoundaryGeometry {
    /// Assemble a boundary, computing its bounding box from the rings.
    ///
    /// # Errors
    ///
    /// [`GeometryError::EmptyGeometry`] if there are no polygons or no
    /// points.
    pub fn new(
        level: BoundaryLevel,
        code: u32,
        name: Option<String>,
        polygons: Vec<GeoPolygon>,
    ) -> Result<Self, GeometryError> {
        let bbox = polygons
            .iter()
            .filter_map(GeoPolygon::bbox)
            .reduce(|a, b| a.union(&b))
            .ok_or(GeometryError::EmptyGeometry)?;
        Ok(Self {
            level,
            code,
            name,
            bbox,
            polygons,
        })
    }
}

/// The plane minus an allowed region: a large enclosing rectangle with
/// each boundary part carved out as a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskGeometry(GeoPolygon);

impl MaskGeometry {
    /// Wrap an exterior and its holes. Orientation is the caller's
    /// responsibility.
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(exterior);
        rings.extend(holes);
        Self(GeoPolygon::from_rings(rings))
    }

    pub fn polygon(&self) -> &GeoPolygon {
        &self.0
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.0.exterior()
    }

    pub fn holes(&self) -> &[Ring] {
        self.0.holes()
    }

    /// Whether `point` lies strictly in the masked-out area.
    ///
    /// Points on a hole edge belong to the jurisdiction and are not
    /// covered.
    pub fn covers(&self, point: &GeoPoint) -> Result<bool, GeometryError> {
        Ok(crate::geometry::locate_point(point, &self.0)? == crate::geometry::Location::Inside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 0.0),
        ])
    }

    #[test]
    fn ring_vertices_drop_closing_duplicate() {
        let ring = square();
        assert!(ring.is_closed());
        assert_eq!(ring.vertices().len(), 4);
        assert_eq!(ring.points().len(), 5);
    }

    #[test]
    fn closed_appends_first_point_once() {
        let open = Ring::new(square().vertices().to_vec());
        assert!(!open.is_closed());
        let closed = open.closed();
        assert!(closed.is_closed());
        assert_eq!(closed.closed().points().len(), 5);
    }

    #[test]
    fn signed_area_flips_with_winding() {
        // lng = x, lat = y: (0,0) → (1,0) → (1,1) → (0,1) is counter-clockwise.
        let ring = square();
        assert!((ring.signed_area_deg() - 1.0).abs() < 1e-12);
        assert!((ring.reversed().signed_area_deg() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn polygon_new_rejects_open_ring() {
        let open = Ring::new(square().vertices().to_vec());
        assert_eq!(GeoPolygon::new(vec![open]), Err(GeometryError::RingNotClosed));
    }

    #[test]
    fn polygon_new_rejects_short_ring() {
        let ring = Ring::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        assert!(matches!(
            GeoPolygon::new(vec![ring]),
            Err(GeometryError::TooFewVertices { .. })
        ));
    }

    #[test]
    fn polygon_new_rejects_nan() {
        let ring = Ring::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(f64::NAN, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]);
        assert!(matches!(
            GeoPolygon::new(vec![ring]),
            Err(GeometryError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn bbox_padding_clamps_to_wgs84() {
        let bbox = BoundingBox {
            north: 88.0,
            south: -88.0,
            east: 178.0,
            west: -178.0,
        };
        let padded = bbox.padded(5.0);
        assert_eq!(padded.north, 90.0);
        assert_eq!(padded.south, -90.0);
        assert_eq!(padded.east, 180.0);
        assert_eq!(padded.west, -180.0);
    }

    #[test]
    fn boundary_bbox_spans_all_parts() {
        let a = GeoPolygon::new(vec![square()]).unwrap();
        let b = GeoPolygon::rectangle(&BoundingBox {
            north: 5.0,
            south: 4.0,
            east: 9.0,
            west: 8.0,
        });
        let boundary = BoundaryGeometry::new(BoundaryLevel::Province, 1, None, vec![a, b]).unwrap();
        assert_eq!(boundary.bbox.north, 5.0);
        assert_eq!(boundary.bbox.south, 0.0);
        assert_eq!(boundary.bbox.east, 9.0);
        assert_eq!(boundary.bbox.west, 0.0);
    }

    #[test]
    fn boundary_without_polygons_is_rejected() {
        assert_eq!(
            BoundaryGeometry::new(BoundaryLevel::Ward, 1, None, vec![]),
            Err(GeometryError::EmptyGeometry)
        );
    }

    #[test]
    fn polygon_serializes_as_array_of_rings() {
        let poly = GeoPolygon::new(vec![square()]).unwrap();
        let json = serde_json::to_value(&poly).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0][1]["lng"], 1.0);
    }
}
