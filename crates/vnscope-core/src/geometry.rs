//! # Geometry Kernel
//!
//! Pure point/polygon primitives used by the authorization layer:
//! point-in-polygon, polygon-in-polygon, great-circle distance and
//! polygon area. No I/O, no state.
//!
//! ## Boundary Policy
//!
//! Containment is **boundary-inclusive**. A point lying on any edge of the
//! exterior ring or of a hole ring (within [`EDGE_TOLERANCE_DEG`]) is
//! classified as inside. Officers surveying exactly on a ward line are
//! therefore accepted by both adjoining wards.
//!
//! ## Planar Approximation
//!
//! Containment tests treat longitude as x and latitude as y. This is exact
//! for the ray-casting classification within a single ward or province and
//! breaks down only across the antimeridian, which Vietnamese boundaries
//! never touch.
//!
//! ## Validation
//!
//! Every operation validates its inputs first: coordinates must be finite
//! WGS84 values and every ring needs at least three distinct vertices.
//! Open rings are treated as implicitly closed.

use std::collections::HashSet;

use crate::error::GeometryError;
use crate::geo::{BoundaryGeometry, GeoPoint, GeoPolygon, Ring};

/// Mean Earth radius used by [`distance_meters`] and [`polygon_area_sq_meters`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distance from an edge, in degrees, at which a point counts as on it
/// (about 0.1 mm at the equator).
pub const EDGE_TOLERANCE_DEG: f64 = 1e-9;

/// Polygons at or below this area are degenerate.
pub const MIN_AREA_SQ_METERS: f64 = 1e-6;

const PARAM_TOLERANCE: f64 = 1e-12;

/// Offset used to sample the interior of a hole next to one of its edges.
const HOLE_SAMPLE_OFFSET_DEG: f64 = 1e-7;

/// Where a point lies relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

// -- Validation ---------------------------------------------------------------

/// Check coordinates and the distinct-vertex minimum of one ring.
pub fn validate_ring(ring: &Ring) -> Result<(), GeometryError> {
    let mut distinct = HashSet::new();
    for p in ring.points() {
        p.validate()?;
        // + 0.0 folds -0.0 onto 0.0 so both hash the same.
        distinct.insert(((p.lat + 0.0).to_bits(), (p.lng + 0.0).to_bits()));
    }
    if distinct.len() < 3 {
        return Err(GeometryError::TooFewVertices {
            distinct: distinct.len(),
        });
    }
    Ok(())
}

/// Check every ring of a polygon.
pub fn validate_polygon(polygon: &GeoPolygon) -> Result<(), GeometryError> {
    if polygon.rings().is_empty() {
        return Err(GeometryError::EmptyGeometry);
    }
    polygon.rings().iter().try_for_each(validate_ring)
}

/// Full structural validation for user-submitted polygons: well-formed
/// rings, no self-intersections, and a non-zero area.
///
/// Rings may not cross or touch one another. Every hole must lie inside
/// the exterior and outside every other hole. A violation is reported as
/// [`GeometryError::SelfIntersection`] naming the later of the two rings.
pub fn validate_simple_polygon(polygon: &GeoPolygon) -> Result<(), GeometryError> {
    validate_polygon(polygon)?;
    let rings = polygon.rings();
    for (idx, ring) in rings.iter().enumerate() {
        if ring_self_intersects(ring) {
            return Err(GeometryError::SelfIntersection { ring: idx });
        }
    }
    for j in 1..rings.len() {
        for i in 0..j {
            if rings_touch(&rings[i], &rings[j]) {
                return Err(GeometryError::SelfIntersection { ring: j });
            }
        }
        // With no contacts, one vertex decides which side a ring is on.
        let first = rings[j].vertices()[0];
        if locate_in_ring(first, &rings[0]) != Location::Inside {
            return Err(GeometryError::SelfIntersection { ring: j });
        }
        for i in 1..j {
            let other = rings[i].vertices()[0];
            if locate_in_ring(first, &rings[i]) == Location::Inside
                || locate_in_ring(other, &rings[j]) == Location::Inside
            {
                return Err(GeometryError::SelfIntersection { ring: j });
            }
        }
    }
    if polygon_area_sq_meters(polygon)? <= MIN_AREA_SQ_METERS {
        return Err(GeometryError::ZeroArea);
    }
    Ok(())
}

// -- Planar helpers -----------------------------------------------------------

fn sub(a: GeoPoint, b: GeoPoint) -> (f64, f64) {
    (a.lng - b.lng, a.lat - b.lat)
}

fn cross(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.1 - u.1 * v.0
}

fn dot(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.0 + u.1 * v.1
}

fn lerp(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint::new(a.lat + (b.lat - a.lat) * t, a.lng + (b.lng - a.lng) * t)
}

fn ring_edges(ring: &Ring) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
    let v = ring.vertices();
    let n = v.len();
    (0..n).map(move |i| (v[i], v[(i + 1) % n]))
}

fn polygon_edges(polygon: &GeoPolygon) -> Vec<(GeoPoint, GeoPoint)> {
    polygon.rings().iter().flat_map(ring_edges).collect()
}

/// Whether `p` lies on segment `a`–`b` within tolerance.
fn on_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> bool {
    let ab = sub(b, a);
    let ap = sub(p, a);
    let len2 = dot(ab, ab);
    if len2 == 0.0 {
        return ap.0.abs() <= EDGE_TOLERANCE_DEG && ap.1.abs() <= EDGE_TOLERANCE_DEG;
    }
    let len = len2.sqrt();
    if cross(ab, ap).abs() > EDGE_TOLERANCE_DEG * len {
        return false;
    }
    let along = dot(ap, ab);
    along >= -EDGE_TOLERANCE_DEG * len && along <= len2 + EDGE_TOLERANCE_DEG * len
}

/// Sign of the turn a → b → c, with near-collinear triples reported as 0.
fn orientation(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> i8 {
    let ab = sub(b, a);
    let ac = sub(c, a);
    let value = cross(ab, ac);
    let scale = dot(ab, ab).sqrt().max(dot(ac, ac).sqrt());
    if value.abs() <= EDGE_TOLERANCE_DEG * scale {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}

/// Inclusive segment intersection: touching endpoints and collinear
/// overlap both count.
fn segments_touch(a: GeoPoint, b: GeoPoint, c: GeoPoint, d: GeoPoint) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);
    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }
    on_segment(c, a, b) || on_segment(d, a, b) || on_segment(a, c, d) || on_segment(b, c, d)
}

/// Parameters along `a`–`b` at which it meets `c`–`d`.
fn intersection_params(a: GeoPoint, b: GeoPoint, c: GeoPoint, d: GeoPoint, out: &mut Vec<f64>) {
    let r = sub(b, a);
    let s = sub(d, c);
    let qp = sub(c, a);
    let rr = dot(r, r);
    if rr == 0.0 {
        return;
    }
    let denom = cross(r, s);
    let scale = rr.sqrt() * dot(s, s).sqrt();
    if denom.abs() > PARAM_TOLERANCE * scale {
        let t = cross(qp, s) / denom;
        let u = cross(qp, r) / denom;
        let range = -PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE;
        if range.contains(&t) && range.contains(&u) {
            out.push(t.clamp(0.0, 1.0));
        }
    } else if cross(qp, r).abs() <= EDGE_TOLERANCE_DEG * rr.sqrt() {
        // Collinear: the overlap is bounded by the projections of c and d.
        for t in [dot(qp, r) / rr, dot(sub(d, a), r) / rr] {
            if (0.0..=1.0).contains(&t) {
                out.push(t);
            }
        }
    }
}

// -- Point location -----------------------------------------------------------

/// Even-odd ray casting against a single ring, with edge detection.
fn locate_in_ring(p: GeoPoint, ring: &Ring) -> Location {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        if on_segment(p, a, b) {
            return Location::Boundary;
        }
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x = (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng;
            if p.lng < x {
                inside = !inside;
            }
        }
    }
    if inside {
        Location::Inside
    } else {
        Location::Outside
    }
}

/// Inside the exterior and not inside any hole. Assumes a validated polygon.
fn locate_unchecked(p: GeoPoint, polygon: &GeoPolygon) -> Location {
    let Some(exterior) = polygon.exterior() else {
        return Location::Outside;
    };
    match locate_in_ring(p, exterior) {
        Location::Outside => Location::Outside,
        Location::Boundary => Location::Boundary,
        Location::Inside => {
            for hole in polygon.holes() {
                match locate_in_ring(p, hole) {
                    Location::Inside => return Location::Outside,
                    Location::Boundary => return Location::Boundary,
                    Location::Outside => {}
                }
            }
            Location::Inside
        }
    }
}

/// Classify `point` against `polygon`.
pub fn locate_point(point: &GeoPoint, polygon: &GeoPolygon) -> Result<Location, GeometryError> {
    point.validate()?;
    validate_polygon(polygon)?;
    Ok(locate_unchecked(*point, polygon))
}

/// Boundary-inclusive point-in-polygon test.
///
/// # Errors
///
/// [`GeometryError`] if the point or polygon is malformed.
pub fn point_in_polygon(point: &GeoPoint, polygon: &GeoPolygon) -> Result<bool, GeometryError> {
    Ok(locate_point(point, polygon)? != Location::Outside)
}

/// Point-in-boundary: inside any part of a (multi)polygon boundary.
pub fn point_in_boundary(
    point: &GeoPoint,
    boundary: &BoundaryGeometry,
) -> Result<bool, GeometryError> {
    point.validate()?;
    validate_boundary(boundary)?;
    if !boundary.bbox.contains(point) {
        return Ok(false);
    }
    Ok(boundary
        .polygons
        .iter()
        .any(|poly| locate_unchecked(*point, poly) != Location::Outside))
}

fn validate_boundary(boundary: &BoundaryGeometry) -> Result<(), GeometryError> {
    if boundary.polygons.is_empty() {
        return Err(GeometryError::EmptyGeometry);
    }
    boundary.polygons.iter().try_for_each(validate_polygon)
}

// -- Polygon containment ------------------------------------------------------

/// A point strictly inside `hole`, next to its longest edge.
fn hole_interior_sample(hole: &Ring) -> Option<GeoPoint> {
    let (a, b) = ring_edges(hole).max_by(|(a1, b1), (a2, b2)| {
        let l1 = dot(sub(*b1, *a1), sub(*b1, *a1));
        let l2 = dot(sub(*b2, *a2), sub(*b2, *a2));
        l1.total_cmp(&l2)
    })?;
    let (dx, dy) = sub(b, a);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let mid = lerp(a, b, 0.5);
    // Unit normal in (lng, lat) space.
    let (nx, ny) = (-dy / len, dx / len);
    [1.0, -1.0].into_iter().find_map(|side: f64| {
        let candidate = GeoPoint::new(
            mid.lat + side * ny * HOLE_SAMPLE_OFFSET_DEG,
            mid.lng + side * nx * HOLE_SAMPLE_OFFSET_DEG,
        );
        (locate_in_ring(candidate, hole) == Location::Inside).then_some(candidate)
    })
}

fn contains_polygon_unchecked(outer: &GeoPolygon, inner: &GeoPolygon) -> bool {
    let Some(inner_exterior) = inner.exterior() else {
        return false;
    };

    if inner_exterior
        .vertices()
        .iter()
        .any(|v| locate_unchecked(*v, outer) == Location::Outside)
    {
        return false;
    }

    // Split each inner edge wherever it meets an outer edge and test every
    // piece: a non-convex outer boundary can let an edge leave and re-enter
    // between two contained vertices.
    let outer_edges = polygon_edges(outer);
    let mut params = Vec::new();
    for (a, b) in ring_edges(inner_exterior) {
        params.clear();
        params.extend([0.0, 1.0]);
        for (c, d) in &outer_edges {
            intersection_params(a, b, *c, *d, &mut params);
        }
        params.sort_by(f64::total_cmp);
        for pair in params.windows(2) {
            if pair[1] - pair[0] <= PARAM_TOLERANCE {
                continue;
            }
            let mid = lerp(a, b, (pair[0] + pair[1]) / 2.0);
            if locate_unchecked(mid, outer) == Location::Outside {
                return false;
            }
        }
    }

    // With no crossings, a hole of `outer` is either wholly inside `inner`
    // or wholly outside it.
    for hole in outer.holes() {
        if let Some(sample) = hole_interior_sample(hole) {
            if locate_unchecked(sample, inner) == Location::Inside {
                return false;
            }
        }
    }
    true
}

/// True iff `inner` lies entirely within `outer` (boundaries may touch).
///
/// Checks every vertex of `inner`, every piece of every `inner` edge cut
/// at its crossings with `outer`, and that no hole of `outer` is enclosed
/// by `inner`.
///
/// # Errors
///
/// [`GeometryError`] if either polygon is malformed.
pub fn polygon_inside_polygon(
    inner: &GeoPolygon,
    outer: &GeoPolygon,
) -> Result<bool, GeometryError> {
    validate_polygon(inner)?;
    validate_polygon(outer)?;
    Ok(contains_polygon_unchecked(outer, inner))
}

/// Polygon-in-boundary: `inner` must fit inside a single part of the
/// boundary. Parts of a province multipolygon are disjoint islands, so a
/// plot never legitimately spans two of them.
pub fn polygon_in_boundary(
    inner: &GeoPolygon,
    boundary: &BoundaryGeometry,
) -> Result<bool, GeometryError> {
    validate_polygon(inner)?;
    validate_boundary(boundary)?;
    Ok(boundary
        .polygons
        .iter()
        .any(|outer| contains_polygon_unchecked(outer, inner)))
}

// -- Self-intersection --------------------------------------------------------

/// Whether a ring crosses or touches itself anywhere other than at the
/// shared vertex of consecutive edges.
pub fn ring_self_intersects(ring: &Ring) -> bool {
    let mut v: Vec<GeoPoint> = Vec::with_capacity(ring.vertices().len());
    for p in ring.vertices() {
        if v.last() != Some(p) {
            v.push(*p);
        }
    }
    while v.len() > 1 && v.first() == v.last() {
        v.pop();
    }
    let n = v.len();
    if n < 3 {
        return false;
    }
    let edge = |i: usize| (v[i], v[(i + 1) % n]);

    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            if j == i + 1 {
                if folds_back((a, b), (c, d)) {
                    return true;
                }
            } else if i == 0 && j == n - 1 {
                if folds_back((c, d), (a, b)) {
                    return true;
                }
            } else if segments_touch(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// Whether any edge of `a` meets any edge of `b`.
fn rings_touch(a: &Ring, b: &Ring) -> bool {
    ring_edges(a).any(|(p, q)| ring_edges(b).any(|(r, t)| segments_touch(p, q, r, t)))
}

/// Consecutive edges `prev` then `next` double back over each other.
fn folds_back(prev: (GeoPoint, GeoPoint), next: (GeoPoint, GeoPoint)) -> bool {
    let r = sub(prev.1, prev.0);
    let s = sub(next.1, next.0);
    orientation(prev.0, prev.1, next.1) == 0 && dot(r, s) < 0.0
}

// -- Metric operations --------------------------------------------------------

/// Great-circle (haversine) distance in meters.
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.min(1.0).sqrt().asin()
}

/// Shoelace area of a ring after equirectangular projection around
/// (`lat0`, `lng0`).
fn projected_ring_area(ring: &Ring, lat0: f64, lng0: f64) -> f64 {
    let k = lat0.to_radians().cos();
    let project = |p: &GeoPoint| {
        (
            EARTH_RADIUS_METERS * (p.lng - lng0).to_radians() * k,
            EARTH_RADIUS_METERS * (p.lat - lat0).to_radians(),
        )
    };
    let v: Vec<(f64, f64)> = ring.vertices().iter().map(project).collect();
    let n = v.len();
    let mut twice = 0.0;
    for i in 0..n {
        let (x1, y1) = v[i];
        let (x2, y2) = v[(i + 1) % n];
        twice += x1 * y2 - x2 * y1;
    }
    twice.abs() / 2.0
}

/// Planar centroid of a ring in (lat, lng), falling back to the vertex
/// mean when the ring encloses no area.
fn ring_centroid(ring: &Ring) -> GeoPoint {
    let v = ring.vertices();
    let origin = v[0];
    let n = v.len();
    let (mut twice_area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let (x1, y1) = sub(v[i], origin);
        let (x2, y2) = sub(v[(i + 1) % n], origin);
        let c = x1 * y2 - x2 * y1;
        twice_area += c;
        cx += (x1 + x2) * c;
        cy += (y1 + y2) * c;
    }
    if twice_area.abs() <= f64::EPSILON {
        let count = n as f64;
        return GeoPoint::new(
            v.iter().map(|p| p.lat).sum::<f64>() / count,
            v.iter().map(|p| p.lng).sum::<f64>() / count,
        );
    }
    GeoPoint::new(
        origin.lat + cy / (3.0 * twice_area),
        origin.lng + cx / (3.0 * twice_area),
    )
}

/// Polygon area in square meters: exterior minus holes, projected onto an
/// equirectangular plane centred on the exterior's centroid.
///
/// Accurate to well under a percent at ward and province scale.
/// Independent of winding direction and of where the vertex list starts.
pub fn polygon_area_sq_meters(polygon: &GeoPolygon) -> Result<f64, GeometryError> {
    validate_polygon(polygon)?;
    let Some(exterior) = polygon.exterior() else {
        return Err(GeometryError::EmptyGeometry);
    };
    let centroid = ring_centroid(exterior);
    let (lat0, lng0) = (centroid.lat, centroid.lng);

    let mut area = projected_ring_area(exterior, lat0, lng0);
    for hole in polygon.holes() {
        area -= projected_ring_area(hole, lat0, lng0);
    }
    Ok(area.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::BoundingBox;
    use crate::scope::BoundaryLevel;
    use proptest::prelude::*;

    fn pt(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng)
    }

    fn poly(points: &[(f64, f64)]) -> GeoPolygon {
        GeoPolygon::from_exterior(points.iter().map(|&(lat, lng)| pt(lat, lng)).collect())
            .unwrap()
    }

    fn hanoi_bbox() -> GeoPolygon {
        GeoPolygon::rectangle(&BoundingBox {
            north: 21.20,
            south: 20.85,
            east: 106.05,
            west: 105.65,
        })
    }

    /// A "C" shape opening to the east, lat/lng in 0..10.
    fn c_shape() -> GeoPolygon {
        poly(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (3.0, 10.0),
            (3.0, 3.0),
            (7.0, 3.0),
            (7.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
        ])
    }

    // -- point_in_polygon --

    #[test]
    fn capital_scenario_inside_and_outside() {
        let hanoi = hanoi_bbox();
        assert!(point_in_polygon(&pt(21.0278, 105.8342), &hanoi).unwrap());
        assert!(!point_in_polygon(&pt(10.8231, 106.6297), &hanoi).unwrap());
    }

    #[test]
    fn edge_and_vertex_count_as_inside() {
        let hanoi = hanoi_bbox();
        assert!(point_in_polygon(&pt(21.20, 105.80), &hanoi).unwrap());
        assert!(point_in_polygon(&pt(21.00, 105.65), &hanoi).unwrap());
        assert!(point_in_polygon(&pt(20.85, 106.05), &hanoi).unwrap());
    }

    #[test]
    fn hole_excludes_interior_but_keeps_its_edge() {
        let outer = Ring::new(vec![
            pt(0.0, 0.0),
            pt(0.0, 10.0),
            pt(10.0, 10.0),
            pt(10.0, 0.0),
            pt(0.0, 0.0),
        ]);
        let hole = Ring::new(vec![
            pt(4.0, 4.0),
            pt(6.0, 4.0),
            pt(6.0, 6.0),
            pt(4.0, 6.0),
            pt(4.0, 4.0),
        ]);
        let donut = GeoPolygon::new(vec![outer, hole]).unwrap();
        assert!(!point_in_polygon(&pt(5.0, 5.0), &donut).unwrap());
        assert!(point_in_polygon(&pt(4.0, 5.0), &donut).unwrap());
        assert!(point_in_polygon(&pt(2.0, 2.0), &donut).unwrap());
    }

    #[test]
    fn concave_notch_is_outside() {
        assert!(!point_in_polygon(&pt(5.0, 8.0), &c_shape()).unwrap());
        assert!(point_in_polygon(&pt(5.0, 1.0), &c_shape()).unwrap());
    }

    #[test]
    fn degenerate_ring_is_invalid_geometry() {
        let line = GeoPolygon::from_rings(vec![Ring::new(vec![
            pt(0.0, 0.0),
            pt(1.0, 1.0),
            pt(0.0, 0.0),
            pt(1.0, 1.0),
        ])]);
        assert!(matches!(
            point_in_polygon(&pt(0.5, 0.5), &line),
            Err(GeometryError::TooFewVertices { distinct: 2 })
        ));
    }

    #[test]
    fn open_provider_ring_is_implicitly_closed() {
        let open = GeoPolygon::from_rings(vec![Ring::new(vec![
            pt(0.0, 0.0),
            pt(0.0, 2.0),
            pt(2.0, 2.0),
            pt(2.0, 0.0),
        ])]);
        assert!(point_in_polygon(&pt(1.0, 1.0), &open).unwrap());
        assert!(point_in_polygon(&pt(1.0, 0.0), &open).unwrap());
    }

    #[test]
    fn invalid_point_is_rejected() {
        assert!(point_in_polygon(&pt(f64::NAN, 0.0), &hanoi_bbox()).is_err());
        assert!(point_in_polygon(&pt(91.0, 0.0), &hanoi_bbox()).is_err());
    }

    // -- polygon_inside_polygon --

    #[test]
    fn rectangle_inside_rectangle() {
        let outer = hanoi_bbox();
        let inner = poly(&[(21.0, 105.8), (21.0, 105.9), (21.1, 105.9), (21.1, 105.8)]);
        assert!(polygon_inside_polygon(&inner, &outer).unwrap());
        assert!(!polygon_inside_polygon(&outer, &inner).unwrap());
    }

    #[test]
    fn edge_bulging_through_notch_is_rejected() {
        // Both vertices sit in the arms of the C; the edge between them
        // crosses the empty notch.
        let plot = poly(&[(1.0, 8.0), (9.0, 8.0), (9.0, 9.0), (1.0, 9.0)]);
        let outer = c_shape();
        for v in plot.exterior().unwrap().vertices() {
            assert!(point_in_polygon(v, &outer).unwrap());
        }
        assert!(!polygon_inside_polygon(&plot, &outer).unwrap());
    }

    #[test]
    fn polygon_touching_outer_edge_is_inside() {
        let outer = c_shape();
        let plot = poly(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        assert!(polygon_inside_polygon(&plot, &outer).unwrap());
    }

    #[test]
    fn polygon_enclosing_outer_hole_is_rejected() {
        let outer = GeoPolygon::new(vec![
            Ring::new(vec![
                pt(0.0, 0.0),
                pt(0.0, 10.0),
                pt(10.0, 10.0),
                pt(10.0, 0.0),
                pt(0.0, 0.0),
            ]),
            Ring::new(vec![
                pt(4.0, 4.0),
                pt(6.0, 4.0),
                pt(6.0, 6.0),
                pt(4.0, 6.0),
                pt(4.0, 4.0),
            ]),
        ])
        .unwrap();
        let around_hole = poly(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)]);
        assert!(!polygon_inside_polygon(&around_hole, &outer).unwrap());
        let beside_hole = poly(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]);
        assert!(polygon_inside_polygon(&beside_hole, &outer).unwrap());
    }

    #[test]
    fn polygon_equal_to_outer_hole_is_rejected() {
        let hole_ring = Ring::new(vec![
            pt(4.0, 4.0),
            pt(6.0, 4.0),
            pt(6.0, 6.0),
            pt(4.0, 6.0),
            pt(4.0, 4.0),
        ]);
        let outer = GeoPolygon::new(vec![
            Ring::new(vec![
                pt(0.0, 0.0),
                pt(0.0, 10.0),
                pt(10.0, 10.0),
                pt(10.0, 0.0),
                pt(0.0, 0.0),
            ]),
            hole_ring.clone(),
        ])
        .unwrap();
        let plot = GeoPolygon::new(vec![hole_ring]).unwrap();
        assert!(!polygon_inside_polygon(&plot, &outer).unwrap());
    }

    #[test]
    fn polygon_in_multipart_boundary() {
        let west = GeoPolygon::rectangle(&BoundingBox {
            north: 1.0,
            south: 0.0,
            east: 1.0,
            west: 0.0,
        });
        let east = GeoPolygon::rectangle(&BoundingBox {
            north: 1.0,
            south: 0.0,
            east: 3.0,
            west: 2.0,
        });
        let boundary =
            BoundaryGeometry::new(BoundaryLevel::Province, 1, None, vec![west, east]).unwrap();
        let in_east = poly(&[(0.2, 2.2), (0.2, 2.8), (0.8, 2.8), (0.8, 2.2)]);
        let spanning = poly(&[(0.2, 0.5), (0.2, 2.5), (0.8, 2.5), (0.8, 0.5)]);
        assert!(polygon_in_boundary(&in_east, &boundary).unwrap());
        assert!(!polygon_in_boundary(&spanning, &boundary).unwrap());
        assert!(point_in_boundary(&pt(0.5, 2.5), &boundary).unwrap());
        assert!(!point_in_boundary(&pt(0.5, 1.5), &boundary).unwrap());
    }

    // -- self-intersection and area --

    #[test]
    fn bowtie_self_intersects() {
        let bowtie = Ring::new(vec![
            pt(0.0, 0.0),
            pt(1.0, 1.0),
            pt(1.0, 0.0),
            pt(0.0, 1.0),
            pt(0.0, 0.0),
        ]);
        assert!(ring_self_intersects(&bowtie));
        let poly = GeoPolygon::new(vec![bowtie]).unwrap();
        assert_eq!(
            validate_simple_polygon(&poly),
            Err(GeometryError::SelfIntersection { ring: 0 })
        );
    }

    #[test]
    fn spike_back_along_edge_self_intersects() {
        let spike = Ring::new(vec![
            pt(0.0, 0.0),
            pt(0.0, 2.0),
            pt(0.0, 1.0),
            pt(1.0, 1.0),
            pt(0.0, 0.0),
        ]);
        assert!(ring_self_intersects(&spike));
    }

    #[test]
    fn simple_polygon_passes_full_validation() {
        assert!(validate_simple_polygon(&c_shape()).is_ok());
        assert!(!ring_self_intersects(c_shape().exterior().unwrap()));
    }

    fn square_ring(south: f64, west: f64, side: f64) -> Ring {
        Ring::new(vec![
            pt(south, west),
            pt(south, west + side),
            pt(south + side, west + side),
            pt(south + side, west),
            pt(south, west),
        ])
    }

    #[test]
    fn hole_crossing_exterior_is_rejected() {
        let outer = square_ring(0.0, 0.0, 0.01);
        let hole = Ring::new(vec![
            pt(0.004, 0.008),
            pt(0.004, 0.02),
            pt(0.006, 0.02),
            pt(0.006, 0.008),
            pt(0.004, 0.008),
        ]);
        let plot = GeoPolygon::new(vec![outer, hole]).unwrap();
        assert_eq!(
            validate_simple_polygon(&plot),
            Err(GeometryError::SelfIntersection { ring: 1 })
        );
    }

    #[test]
    fn hole_outside_exterior_is_rejected() {
        let outer = square_ring(0.0, 0.0, 0.01);
        let hole = square_ring(0.02, 0.02, 0.002);
        let plot = GeoPolygon::new(vec![outer, hole]).unwrap();
        assert_eq!(
            validate_simple_polygon(&plot),
            Err(GeometryError::SelfIntersection { ring: 1 })
        );
    }

    #[test]
    fn hole_touching_exterior_is_rejected() {
        let outer = square_ring(0.0, 0.0, 0.01);
        let hole = square_ring(0.0, 0.004, 0.002);
        let plot = GeoPolygon::new(vec![outer, hole]).unwrap();
        assert_eq!(
            validate_simple_polygon(&plot),
            Err(GeometryError::SelfIntersection { ring: 1 })
        );
    }

    #[test]
    fn nested_or_overlapping_holes_are_rejected() {
        let outer = square_ring(0.0, 0.0, 0.01);
        let nested = GeoPolygon::new(vec![
            outer.clone(),
            square_ring(0.002, 0.002, 0.006),
            square_ring(0.004, 0.004, 0.001),
        ])
        .unwrap();
        assert_eq!(
            validate_simple_polygon(&nested),
            Err(GeometryError::SelfIntersection { ring: 2 })
        );
        let overlapping = GeoPolygon::new(vec![
            outer,
            square_ring(0.002, 0.002, 0.003),
            square_ring(0.004, 0.004, 0.003),
        ])
        .unwrap();
        assert_eq!(
            validate_simple_polygon(&overlapping),
            Err(GeometryError::SelfIntersection { ring: 2 })
        );
    }

    #[test]
    fn disjoint_holes_inside_exterior_are_accepted() {
        let plot = GeoPolygon::new(vec![
            square_ring(0.0, 0.0, 0.01),
            square_ring(0.001, 0.001, 0.002),
            square_ring(0.006, 0.006, 0.002),
        ])
        .unwrap();
        assert!(validate_simple_polygon(&plot).is_ok());
    }

    #[test]
    fn area_is_unaffected_by_vertex_clustering() {
        // Extra vertices bunched on one edge move the vertex mean but not
        // the centroid.
        let d = 1.0;
        let square = poly(&[(0.0, 0.0), (0.0, d), (d, d), (d, 0.0)]);
        let clustered = poly(&[
            (0.0, 0.0),
            (0.0, d),
            (d, d),
            (d, 0.9 * d),
            (d, 0.8 * d),
            (d, 0.7 * d),
            (d, 0.0),
        ]);
        let a = polygon_area_sq_meters(&square).unwrap();
        let b = polygon_area_sq_meters(&clustered).unwrap();
        assert!((a - b).abs() / a < 1e-12, "{a} vs {b}");
    }

    #[test]
    fn collinear_ring_has_zero_area() {
        let flat = GeoPolygon::new(vec![Ring::new(vec![
            pt(0.0, 0.0),
            pt(0.0, 1.0),
            pt(0.0, 2.0),
            pt(0.0, 0.0),
        ])])
        .unwrap();
        assert_eq!(polygon_area_sq_meters(&flat).unwrap(), 0.0);
        assert!(validate_simple_polygon(&flat).is_err());
    }

    #[test]
    fn one_arc_minute_square_near_equator() {
        let d = 1.0 / 60.0;
        let square = poly(&[(0.0, 0.0), (0.0, d), (d, d), (d, 0.0)]);
        let side = EARTH_RADIUS_METERS * d.to_radians();
        let area = polygon_area_sq_meters(&square).unwrap();
        assert!((area - side * side).abs() / (side * side) < 1e-4);
    }

    #[test]
    fn hole_area_is_subtracted() {
        let outer = Ring::new(vec![
            pt(0.0, 0.0),
            pt(0.0, 0.01),
            pt(0.01, 0.01),
            pt(0.01, 0.0),
            pt(0.0, 0.0),
        ]);
        let hole = Ring::new(vec![
            pt(0.0025, 0.0025),
            pt(0.0075, 0.0025),
            pt(0.0075, 0.0075),
            pt(0.0025, 0.0075),
            pt(0.0025, 0.0025),
        ]);
        let full = polygon_area_sq_meters(&GeoPolygon::new(vec![outer.clone()]).unwrap()).unwrap();
        let donut = polygon_area_sq_meters(&GeoPolygon::new(vec![outer, hole]).unwrap()).unwrap();
        assert!((donut / full - 0.75).abs() < 1e-3);
    }

    // -- distance --

    #[test]
    fn hanoi_to_saigon_distance() {
        let hanoi = pt(21.0278, 105.8342);
        let saigon = pt(10.8231, 106.6297);
        let d = distance_meters(&hanoi, &saigon);
        assert!((1_130_000.0..1_150_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn quarter_meridian_length() {
        let d = distance_meters(&pt(0.0, 0.0), &pt(90.0, 0.0));
        let expected = EARTH_RADIUS_METERS * std::f64::consts::FRAC_PI_2;
        assert!((d - expected).abs() < 1e-6);
    }

    // -- properties --

    fn star_polygon() -> impl Strategy<Value = GeoPolygon> {
        (3usize..12)
            .prop_flat_map(|n| {
                (
                    prop::collection::vec(0.0..0.9f64, n),
                    prop::collection::vec(0.01..0.1f64, n),
                    8.0..23.0f64,
                    102.0..109.0f64,
                )
            })
            .prop_map(|(jitter, radii, lat0, lng0)| {
                let n = radii.len();
                let points = (0..n)
                    .map(|i| {
                        let theta =
                            (i as f64 + jitter[i]) * std::f64::consts::TAU / n as f64;
                        pt(lat0 + radii[i] * theta.sin(), lng0 + radii[i] * theta.cos())
                    })
                    .collect();
                GeoPolygon::from_exterior(points).unwrap()
            })
    }

    fn rotated(polygon: &GeoPolygon, k: usize) -> GeoPolygon {
        let mut v = polygon.exterior().unwrap().vertices().to_vec();
        let shift = k % v.len();
        v.rotate_left(shift);
        GeoPolygon::from_exterior(v).unwrap()
    }

    proptest! {
        #[test]
        fn containment_ignores_vertex_order(
            polygon in star_polygon(),
            dlat in -0.12..0.12f64,
            dlng in -0.12..0.12f64,
        ) {
            let c = polygon.bbox().unwrap().center();
            let p = pt(c.lat + dlat, c.lng + dlng);
            prop_assert_eq!(
                point_in_polygon(&p, &polygon).unwrap(),
                point_in_polygon(&p, &polygon.reversed()).unwrap()
            );
        }

        #[test]
        fn rectangle_strict_inside_outside_and_edge(
            south in -10.0..10.0f64,
            west in 100.0..110.0f64,
            h in 0.01..1.0f64,
            w in 0.01..1.0f64,
            fy in 0.01..0.99f64,
            fx in 0.01..0.99f64,
        ) {
            let bbox = BoundingBox { north: south + h, south, east: west + w, west };
            let rect = GeoPolygon::rectangle(&bbox);
            let inside = pt(south + fy * h, west + fx * w);
            let outside = pt(south + fy * h, west + w + 0.5);
            let on_edge = pt(south, west + fx * w);
            prop_assert!(point_in_polygon(&inside, &rect).unwrap());
            prop_assert!(!point_in_polygon(&outside, &rect).unwrap());
            prop_assert!(point_in_polygon(&on_edge, &rect).unwrap());
        }

        #[test]
        fn polygon_contains_itself(polygon in star_polygon()) {
            prop_assert!(polygon_inside_polygon(&polygon, &polygon).unwrap());
        }

        #[test]
        fn area_ignores_winding_and_rotation(polygon in star_polygon(), k in 0usize..12) {
            let base = polygon_area_sq_meters(&polygon).unwrap();
            let reversed = polygon_area_sq_meters(&polygon.reversed()).unwrap();
            let shifted = polygon_area_sq_meters(&rotated(&polygon, k)).unwrap();
            prop_assert!(base > 0.0);
            prop_assert!((base - reversed).abs() <= base * 1e-9);
            prop_assert!((base - shifted).abs() <= base * 1e-9);
        }

        #[test]
        fn distance_is_symmetric_and_zero_on_self(
            lat1 in -89.0..89.0f64, lng1 in -179.0..179.0f64,
            lat2 in -89.0..89.0f64, lng2 in -179.0..179.0f64,
        ) {
            let a = pt(lat1, lng1);
            let b = pt(lat2, lng2);
            prop_assert_eq!(distance_meters(&a, &a), 0.0);
            prop_assert!((distance_meters(&a, &b) - distance_meters(&b, &a)).abs() < 1e-6);
        }
    }
}
