//! # Survey Intake
//!
//! Submissions are validated against the submitter's jurisdiction before
//! anything is stored. Checks run in order (location codes, GPS point,
//! plot containment, plot simplicity) and the first failure is returned:
//!
//! | Failure                     | Status | Code                       |
//! |-----------------------------|--------|----------------------------|
//! | codes outside jurisdiction  | 403    | `LOCATION_OUT_OF_SCOPE`    |
//! | point outside boundary      | 422    | `POINT_OUTSIDE_BOUNDARY`   |
//! | plot crosses boundary       | 422    | `POLYGON_OUTSIDE_BOUNDARY` |
//! | self-intersecting plot      | 422    | `INVALID_GEOMETRY`         |
//! | boundary cannot be fetched  | 503    | `BOUNDARY_UNAVAILABLE`     |

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vnscope_access::{Submission, ValidationError};
use vnscope_core::polygon_area_sq_meters;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::{AppState, SurveyRecord};

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    #[serde(flatten)]
    pub submission: Submission,
    #[serde(default)]
    pub answers: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/submissions", post(create_submission))
        .route("/v1/submissions/validate", post(validate_submission))
}

/// POST /v1/submissions/validate — Dry-run validation.
async fn validate_submission(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<ValidationResponse>, AppError> {
    let submission = extract_json(body)?;
    state
        .facade
        .validate_submission(&caller.scope, &submission)
        .await?;
    Ok(Json(ValidationResponse { valid: true }))
}

/// POST /v1/submissions — Validate and store a survey record.
async fn create_submission(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SurveyRecord>), AppError> {
    let req = extract_json(body)?;
    state
        .facade
        .validate_submission(&caller.scope, &req.submission)
        .await?;

    let area_sq_meters = req
        .submission
        .polygon
        .as_ref()
        .map(polygon_area_sq_meters)
        .transpose()
        .map_err(ValidationError::from)?;

    let Submission {
        province_code,
        ward_code,
        point,
        polygon,
    } = req.submission;
    let record = SurveyRecord {
        id: Uuid::new_v4(),
        submitted_by: caller.user_id,
        province_code,
        ward_code,
        point,
        polygon,
        area_sq_meters,
        answers: req.answers,
        created_at: Utc::now(),
    };
    state.records.insert(record.id, record.clone());
    tracing::info!(
        record_id = %record.id,
        submitted_by = %record.submitted_by,
        province = ?record.province_code.map(|p| p.get()),
        ward = ?record.ward_code.map(|w| w.get()),
        "survey record stored"
    );

    Ok((StatusCode::CREATED, Json(record)))
}
