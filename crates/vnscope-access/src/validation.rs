//! # Submission Validation
//!
//! Entry point for survey intake. Checks run in a fixed order and the
//! first failure is returned:
//!
//! 1. Location codes are within the submitter's scope
//!    ([`ValidationError::LocationOutOfScope`]).
//! 2. The GPS point, if any, lies within the resolved boundary
//!    ([`ValidationError::PointOutsideBoundary`]).
//! 3. The plot polygon, if any, lies fully within the boundary
//!    ([`ValidationError::PolygonOutsideBoundary`]).
//! 4. The polygon is simple and encloses a non-zero area
//!    ([`ValidationError::InvalidGeometry`]).
//!
//! The boundary is resolved only when a point or polygon is present.
//! Rejections are expected outcomes and log at `debug`.

use serde::{Deserialize, Serialize};
use vnscope_boundary::BoundaryError;
use vnscope_core::{
    point_in_boundary, polygon_in_boundary, validate_simple_polygon, BoundaryLevel, GeoPoint,
    GeoPolygon, GeometryError, JurisdictionScope, ProvinceCode, WardCode,
};

use crate::decision::AccessReason;
use crate::evaluator::AccessEvaluator;

/// The location-bearing part of a survey submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub province_code: Option<ProvinceCode>,
    #[serde(default)]
    pub ward_code: Option<WardCode>,
    /// Where the officer stood.
    #[serde(default)]
    pub point: Option<GeoPoint>,
    /// Surveyed plot outline.
    #[serde(default)]
    pub polygon: Option<GeoPolygon>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("location is outside the submitter's jurisdiction")]
    LocationOutOfScope,
    #[error("account has no jurisdiction assigned")]
    NoScopeAssigned,
    #[error("point lies outside the jurisdiction boundary")]
    PointOutsideBoundary,
    #[error("polygon is not fully inside the jurisdiction boundary")]
    PolygonOutsideBoundary,
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
    #[error("{level} boundary {code} unavailable: {reason}")]
    BoundaryUnavailable {
        level: BoundaryLevel,
        code: u32,
        reason: String,
    },
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LocationOutOfScope => "location_out_of_scope",
            Self::NoScopeAssigned => "no_scope_assigned",
            Self::PointOutsideBoundary => "point_outside_boundary",
            Self::PolygonOutsideBoundary => "polygon_outside_boundary",
            Self::InvalidGeometry(_) => "invalid_geometry",
            Self::BoundaryUnavailable { .. } => "boundary_unavailable",
        }
    }
}

impl From<BoundaryError> for ValidationError {
    fn from(err: BoundaryError) -> Self {
        match err {
            BoundaryError::NoScopeAssigned => Self::NoScopeAssigned,
            BoundaryError::Unavailable {
                level,
                code,
                reason,
            } => Self::BoundaryUnavailable {
                level,
                code,
                reason,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationFacade {
    evaluator: AccessEvaluator,
}

impl ValidationFacade {
    pub fn new(evaluator: AccessEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &AccessEvaluator {
        &self.evaluator
    }

    /// Validate a submission for `scope`, returning the first failure.
    pub async fn validate_submission(
        &self,
        scope: &JurisdictionScope,
        submission: &Submission,
    ) -> Result<(), ValidationError> {
        let result = self.run_checks(scope, submission).await;
        if let Err(e) = &result {
            tracing::debug!(scope = %scope.label(), code = e.code(), "submission rejected");
        }
        result
    }

    async fn run_checks(
        &self,
        scope: &JurisdictionScope,
        submission: &Submission,
    ) -> Result<(), ValidationError> {
        let decision = self.evaluator.can_access_location(
            scope,
            submission.province_code,
            submission.ward_code,
        );
        if !decision.allowed {
            return Err(match decision.reason {
                AccessReason::NoScopeAssigned => ValidationError::NoScopeAssigned,
                _ => ValidationError::LocationOutOfScope,
            });
        }

        if submission.point.is_none() && submission.polygon.is_none() {
            return Ok(());
        }
        let boundary = if scope.is_admin() {
            None
        } else {
            self.evaluator.resolver().resolve(scope).await?
        };

        if let Some(point) = &submission.point {
            match &boundary {
                Some(b) => {
                    if !point_in_boundary(point, b)? {
                        return Err(ValidationError::PointOutsideBoundary);
                    }
                }
                None => point.validate()?,
            }
        }

        if let Some(polygon) = &submission.polygon {
            if let Some(b) = &boundary {
                if !polygon_in_boundary(polygon, b)? {
                    return Err(ValidationError::PolygonOutsideBoundary);
                }
            }
            validate_simple_polygon(polygon)?;
        }
        Ok(())
    }
}
