//! # Error Types
//!
//! Errors raised by the core value types. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Geometry errors are always local validation failures: they are returned
//! to the caller and never abort the process.

use thiserror::Error;

/// A geometry could not be used for containment or area computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A ring has fewer than three distinct vertices.
    #[error("ring has {distinct} distinct vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of distinct vertices found.
        distinct: usize,
    },

    /// A ring's first and last vertices differ.
    #[error("ring is not closed: first vertex must equal last vertex")]
    RingNotClosed,

    /// A coordinate is NaN, infinite, or outside WGS84 range.
    #[error("coordinate ({lat}, {lng}) is not a valid WGS84 position")]
    NonFiniteCoordinate {
        /// Latitude as received.
        lat: f64,
        /// Longitude as received.
        lng: f64,
    },

    /// Two non-adjacent edges of a ring intersect.
    #[error("ring {ring} intersects itself")]
    SelfIntersection {
        /// Index of the offending ring (0 = exterior).
        ring: usize,
    },

    /// The polygon encloses no area.
    #[error("polygon has zero area")]
    ZeroArea,

    /// A polygon or boundary carries no rings at all.
    #[error("geometry has no rings")]
    EmptyGeometry,
}

/// Validation failure when constructing identity or scope values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Province codes are positive integers.
    #[error("invalid province code: {0}")]
    InvalidProvinceCode(i64),

    /// Ward codes are positive integers.
    #[error("invalid ward code: {0}")]
    InvalidWardCode(i64),

    /// User identifiers must be non-empty.
    #[error("user id must not be empty")]
    EmptyUserId,
}
