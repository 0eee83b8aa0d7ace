//! # Caller Scope
//!
//! Presentation view of the caller's jurisdiction: the label to show, the
//! row filter the data store applies, the extent to fit the map to, the
//! boundary outline, and the mask dimming everything outside it.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use vnscope_access::{build_filter, LocationFilter};
use vnscope_core::{
    BoundaryGeometry, BoundingBox, GeoPoint, MaskGeometry, ProvinceCode, Role, ScopeLevel,
    UserId, WardCode,
};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScopeResponse {
    pub user_id: UserId,
    pub role: Option<Role>,
    pub label: String,
    pub scope_level: Option<ScopeLevel>,
    pub is_admin: bool,
    pub province_code: Option<ProvinceCode>,
    pub ward_code: Option<WardCode>,
    pub filter: LocationFilter,
    /// Extent to fit the map to; `None` for national scope.
    pub bbox: Option<BoundingBox>,
    pub center: Option<GeoPoint>,
    pub boundary: Option<BoundaryGeometry>,
    pub mask: Option<MaskGeometry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/scope", get(current_scope))
}

/// GET /v1/scope — Describe the caller's jurisdiction.
async fn current_scope(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<ScopeResponse>, AppError> {
    let scope = caller.scope;
    let filter = build_filter(&scope)?;
    let region = state.evaluator.resolver().describe(&scope).await?;
    let mask = state.mask_builder.build(region.boundary.as_deref());

    Ok(Json(ScopeResponse {
        user_id: caller.user_id,
        role: caller.role,
        label: region.label,
        scope_level: scope.level(),
        is_admin: scope.is_admin(),
        province_code: scope.province_code(),
        ward_code: scope.ward_code(),
        filter,
        bbox: region.bbox,
        center: region.bbox.map(|b| b.center()),
        boundary: region.boundary.as_deref().cloned(),
        mask,
    }))
}
