//! # Access Evaluator
//!
//! The authorization decision layer. Every check takes the session's
//! [`JurisdictionScope`] as derived server-side; caller-supplied
//! jurisdiction claims never enter a decision.
//!
//! ## Precedence
//!
//! 1. Admin: allowed (`admin_bypass`).
//! 2. Nationwide officer: allowed (`within_scope`).
//! 3. Province officer: target province must match.
//! 4. Ward officer: target province and ward must both match.
//! 5. Unassigned: denied (`no_scope_assigned`).
//!
//! Geometric checks resolve the scope's boundary first and deny with
//! `boundary_unavailable` when it cannot be fetched.

use std::sync::Arc;

use vnscope_boundary::{BoundaryError, BoundaryResolver};
use vnscope_core::{
    point_in_boundary, polygon_in_boundary, BoundaryGeometry, GeoPoint, GeoPolygon,
    GeometryError, JurisdictionScope, ProvinceCode, WardCode,
};

use crate::decision::{AccessDecision, AccessReason};

/// Code-based check of a target location against `scope`.
///
/// A target missing a code the scope needs is outside the scope.
pub fn can_access_location(
    scope: &JurisdictionScope,
    target_province: Option<ProvinceCode>,
    target_ward: Option<WardCode>,
) -> AccessDecision {
    match scope {
        JurisdictionScope::National { is_admin: true } => {
            AccessDecision::allow(AccessReason::AdminBypass)
        }
        JurisdictionScope::National { is_admin: false } => {
            AccessDecision::allow(AccessReason::WithinScope)
        }
        JurisdictionScope::Province { province_code } => {
            if target_province == Some(*province_code) {
                AccessDecision::allow(AccessReason::WithinScope)
            } else {
                AccessDecision::deny(AccessReason::OutsideScope)
            }
        }
        JurisdictionScope::Ward {
            province_code,
            ward_code,
        } => {
            if target_province == Some(*province_code) && target_ward == Some(*ward_code) {
                AccessDecision::allow(AccessReason::WithinScope)
            } else {
                AccessDecision::deny(AccessReason::OutsideScope)
            }
        }
        JurisdictionScope::Unassigned => AccessDecision::deny(AccessReason::NoScopeAssigned),
    }
}

/// Evaluator for code and geometry checks; shares a [`BoundaryResolver`].
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    resolver: Arc<BoundaryResolver>,
}

impl AccessEvaluator {
    pub fn new(resolver: Arc<BoundaryResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<BoundaryResolver> {
        &self.resolver
    }

    pub fn can_access_location(
        &self,
        scope: &JurisdictionScope,
        target_province: Option<ProvinceCode>,
        target_ward: Option<WardCode>,
    ) -> AccessDecision {
        can_access_location(scope, target_province, target_ward)
    }

    /// Whether `point` lies within the scope's boundary (edges inclusive).
    pub async fn can_access_point(
        &self,
        scope: &JurisdictionScope,
        point: &GeoPoint,
    ) -> AccessDecision {
        self.check_geometry(scope, |boundary| point_in_boundary(point, boundary))
            .await
    }

    /// Whether `polygon` lies entirely within the scope's boundary.
    pub async fn can_access_polygon(
        &self,
        scope: &JurisdictionScope,
        polygon: &GeoPolygon,
    ) -> AccessDecision {
        self.check_geometry(scope, |boundary| polygon_in_boundary(polygon, boundary))
            .await
    }

    async fn check_geometry<F>(&self, scope: &JurisdictionScope, contains: F) -> AccessDecision
    where
        F: FnOnce(&BoundaryGeometry) -> Result<bool, GeometryError>,
    {
        if scope.is_admin() {
            return AccessDecision::allow(AccessReason::AdminBypass);
        }
        let boundary = match self.resolver.resolve(scope).await {
            Ok(Some(boundary)) => boundary,
            Ok(None) => return AccessDecision::allow(AccessReason::WithinScope),
            Err(BoundaryError::NoScopeAssigned) => {
                return AccessDecision::deny(AccessReason::NoScopeAssigned)
            }
            Err(BoundaryError::Unavailable { .. }) => {
                return AccessDecision::deny(AccessReason::BoundaryUnavailable)
            }
        };
        match contains(&boundary) {
            Ok(true) => AccessDecision::allow(AccessReason::WithinScope),
            Ok(false) => AccessDecision::deny(AccessReason::OutsideScope),
            Err(e) => {
                tracing::debug!(
                    level = %boundary.level,
                    code = boundary.code,
                    error = %e,
                    "geometry check failed"
                );
                AccessDecision::deny(AccessReason::InvalidGeometry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{evaluator, failing_evaluator, province17, ward19051};

    fn p(code: i64) -> Option<ProvinceCode> {
        Some(ProvinceCode::new(code).unwrap())
    }

    fn w(code: i64) -> Option<WardCode> {
        Some(WardCode::new(code).unwrap())
    }

    #[test]
    fn ward_officer_is_limited_to_own_ward() {
        let scope = ward19051();
        assert!(can_access_location(&scope, p(17), w(19051)).allowed);
        let other = can_access_location(&scope, p(17), w(19052));
        assert_eq!(other, AccessDecision::deny(AccessReason::OutsideScope));
        assert!(!can_access_location(&scope, p(18), w(19051)).allowed);
    }

    #[test]
    fn province_officer_sees_every_ward_in_province() {
        let scope = province17();
        assert!(can_access_location(&scope, p(17), w(19051)).allowed);
        assert!(can_access_location(&scope, p(17), w(19052)).allowed);
        assert!(can_access_location(&scope, p(17), None).allowed);
        assert!(!can_access_location(&scope, p(18), w(19051)).allowed);
    }

    #[test]
    fn admin_is_allowed_everywhere() {
        let scope = JurisdictionScope::admin();
        for (prov, ward) in [(p(17), w(19051)), (p(1), None), (None, None)] {
            assert_eq!(
                can_access_location(&scope, prov, ward),
                AccessDecision::allow(AccessReason::AdminBypass)
            );
        }
    }

    #[test]
    fn missing_target_codes_are_outside_scope() {
        assert!(!can_access_location(&province17(), None, w(19051)).allowed);
        assert!(!can_access_location(&ward19051(), p(17), None).allowed);
        assert!(can_access_location(&JurisdictionScope::national(), None, None).allowed);
    }

    #[test]
    fn unassigned_scope_is_denied_with_distinct_reason() {
        let decision = can_access_location(&JurisdictionScope::Unassigned, p(17), w(19051));
        assert_eq!(decision, AccessDecision::deny(AccessReason::NoScopeAssigned));
    }

    #[tokio::test]
    async fn point_checks_use_the_ward_boundary() {
        let evaluator = evaluator();
        let scope = ward19051();
        let inside = evaluator.can_access_point(&scope, &GeoPoint::new(21.05, 105.85)).await;
        assert_eq!(inside, AccessDecision::allow(AccessReason::WithinScope));
        let on_edge = evaluator.can_access_point(&scope, &GeoPoint::new(21.0, 105.85)).await;
        assert!(on_edge.allowed);
        let outside = evaluator.can_access_point(&scope, &GeoPoint::new(10.8231, 106.6297)).await;
        assert_eq!(outside, AccessDecision::deny(AccessReason::OutsideScope));
    }

    #[tokio::test]
    async fn national_and_admin_points_skip_geometry() {
        let evaluator = failing_evaluator();
        let far = GeoPoint::new(10.8231, 106.6297);
        assert_eq!(
            evaluator.can_access_point(&JurisdictionScope::admin(), &far).await,
            AccessDecision::allow(AccessReason::AdminBypass)
        );
        assert_eq!(
            evaluator.can_access_point(&JurisdictionScope::national(), &far).await,
            AccessDecision::allow(AccessReason::WithinScope)
        );
    }

    #[tokio::test]
    async fn missing_boundary_denies_fail_closed() {
        let evaluator = failing_evaluator();
        let decision = evaluator
            .can_access_point(&ward19051(), &GeoPoint::new(21.05, 105.85))
            .await;
        assert_eq!(decision, AccessDecision::deny(AccessReason::BoundaryUnavailable));
    }

    #[tokio::test]
    async fn invalid_point_is_invalid_geometry() {
        let decision = evaluator()
            .can_access_point(&ward19051(), &GeoPoint::new(f64::NAN, 105.85))
            .await;
        assert_eq!(decision, AccessDecision::deny(AccessReason::InvalidGeometry));
    }

    #[tokio::test]
    async fn unassigned_point_check_is_denied() {
        let decision = evaluator()
            .can_access_point(&JurisdictionScope::Unassigned, &GeoPoint::new(21.05, 105.85))
            .await;
        assert_eq!(decision, AccessDecision::deny(AccessReason::NoScopeAssigned));
    }

    #[tokio::test]
    async fn polygon_checks_require_full_containment() {
        let evaluator = evaluator();
        let scope = ward19051();
        let inside = GeoPolygon::from_exterior(vec![
            GeoPoint::new(21.02, 105.82),
            GeoPoint::new(21.02, 105.84),
            GeoPoint::new(21.04, 105.84),
            GeoPoint::new(21.04, 105.82),
        ])
        .unwrap();
        let straddling = GeoPolygon::from_exterior(vec![
            GeoPoint::new(21.02, 105.88),
            GeoPoint::new(21.02, 105.95),
            GeoPoint::new(21.04, 105.95),
            GeoPoint::new(21.04, 105.88),
        ])
        .unwrap();
        assert!(evaluator.can_access_polygon(&scope, &inside).await.allowed);
        assert_eq!(
            evaluator.can_access_polygon(&scope, &straddling).await,
            AccessDecision::deny(AccessReason::OutsideScope)
        );
    }
}
