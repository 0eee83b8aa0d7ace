//! # Survey Records
//!
//! Listing applies the caller's [`LocationFilter`](vnscope_access::LocationFilter)
//! as the store predicate and then re-checks every returned row with the
//! access evaluator. A record outside the caller's jurisdiction is
//! indistinguishable from a missing one.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;
use vnscope_access::{build_filter, filter_batch};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::{AppState, SurveyRecord};

#[derive(Debug, Serialize)]
pub struct RecordList {
    pub count: usize,
    pub records: Vec<SurveyRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/records", get(list_records))
        .route("/v1/records/:id", get(get_record))
}

/// GET /v1/records — Records within the caller's jurisdiction, newest first.
async fn list_records(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<RecordList>, AppError> {
    let filter = build_filter(&caller.scope)?;
    let candidates = state
        .records
        .list_where(|r| filter.matches(r.province_code, r.ward_code));
    let mut records = filter_batch(&caller.scope, candidates);
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

    Ok(Json(RecordList {
        count: records.len(),
        records,
    }))
}

/// GET /v1/records/:id — A single record.
async fn get_record(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<SurveyRecord>, AppError> {
    build_filter(&caller.scope)?;
    let record = state
        .records
        .get(&id)
        .filter(|r| {
            state
                .evaluator
                .can_access_location(&caller.scope, r.province_code, r.ward_code)
                .allowed
        })
        .ok_or_else(|| AppError::NotFound(format!("record {id} not found")))?;
    Ok(Json(record))
}
