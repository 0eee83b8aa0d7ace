//! # Access Checks
//!
//! Ask whether the caller may act at a location. A denial is a normal
//! `200` response with `allowed: false` and a reason; only transport and
//! parse failures are HTTP errors.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use vnscope_access::AccessDecision;
use vnscope_core::{GeoPoint, GeoPolygon, ProvinceCode, WardCode};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub province_code: Option<ProvinceCode>,
    #[serde(default)]
    pub ward_code: Option<WardCode>,
}

#[derive(Debug, Deserialize)]
pub struct PolygonRequest {
    pub polygon: GeoPolygon,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/access/location", post(check_location))
        .route("/v1/access/point", post(check_point))
        .route("/v1/access/polygon", post(check_polygon))
}

/// POST /v1/access/location — Check administrative codes.
async fn check_location(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<AccessDecision>, AppError> {
    let req = extract_json(body)?;
    Ok(Json(state.evaluator.can_access_location(
        &caller.scope,
        req.province_code,
        req.ward_code,
    )))
}

/// POST /v1/access/point — Check a GPS position against the boundary.
async fn check_point(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<GeoPoint>, JsonRejection>,
) -> Result<Json<AccessDecision>, AppError> {
    let point = extract_json(body)?;
    Ok(Json(
        state.evaluator.can_access_point(&caller.scope, &point).await,
    ))
}

/// POST /v1/access/polygon — Check that a plot lies inside the boundary.
async fn check_polygon(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<PolygonRequest>, JsonRejection>,
) -> Result<Json<AccessDecision>, AppError> {
    let req = extract_json(body)?;
    Ok(Json(
        state
            .evaluator
            .can_access_polygon(&caller.scope, &req.polygon)
            .await,
    ))
}
