//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps access, validation, and boundary errors to HTTP status codes with
//! a JSON body `{ "error": { "code", "message" } }`.
//!
//! | Error                         | Status | Code                       |
//! |-------------------------------|--------|----------------------------|
//! | location out of scope         | 403    | `LOCATION_OUT_OF_SCOPE`    |
//! | no jurisdiction assigned      | 403    | `NO_SCOPE_ASSIGNED`        |
//! | point / polygon outside       | 422    | `POINT_OUTSIDE_BOUNDARY` / `POLYGON_OUTSIDE_BOUNDARY` |
//! | invalid geometry              | 422    | `INVALID_GEOMETRY`         |
//! | boundary unavailable          | 503    | `BOUNDARY_UNAVAILABLE`     |
//!
//! Internal and upstream failure details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vnscope_access::{NoScopeAssigned, ValidationError};
use vnscope_boundary::BoundaryError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "NO_SCOPE_ASSIGNED").
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The account has no jurisdiction and is not an administrator (403).
    #[error("account has not been assigned a jurisdiction")]
    NoScopeAssigned,

    /// A submission failed validation; status depends on the cause.
    #[error(transparent)]
    Submission(#[from] ValidationError),

    /// Boundary reference data is missing (503).
    #[error("jurisdiction boundary unavailable: {0}")]
    BoundaryUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NoScopeAssigned => (StatusCode::FORBIDDEN, "NO_SCOPE_ASSIGNED"),
            Self::Submission(e) => match e {
                ValidationError::LocationOutOfScope => {
                    (StatusCode::FORBIDDEN, "LOCATION_OUT_OF_SCOPE")
                }
                ValidationError::NoScopeAssigned => (StatusCode::FORBIDDEN, "NO_SCOPE_ASSIGNED"),
                ValidationError::PointOutsideBoundary => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "POINT_OUTSIDE_BOUNDARY")
                }
                ValidationError::PolygonOutsideBoundary => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "POLYGON_OUTSIDE_BOUNDARY")
                }
                ValidationError::InvalidGeometry(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_GEOMETRY")
                }
                ValidationError::BoundaryUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "BOUNDARY_UNAVAILABLE")
                }
            },
            Self::BoundaryUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "BOUNDARY_UNAVAILABLE")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::BoundaryUnavailable(_)
            | Self::Submission(ValidationError::BoundaryUnavailable { .. }) => {
                "Jurisdiction boundary is temporarily unavailable".to_string()
            }
            Self::Submission(ValidationError::NoScopeAssigned) => Self::NoScopeAssigned.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.public_message();

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<BoundaryError> for AppError {
    fn from(err: BoundaryError) -> Self {
        match err {
            BoundaryError::NoScopeAssigned => Self::NoScopeAssigned,
            unavailable @ BoundaryError::Unavailable { .. } => {
                Self::BoundaryUnavailable(unavailable.to_string())
            }
        }
    }
}

impl From<NoScopeAssigned> for AppError {
    fn from(_: NoScopeAssigned) -> Self {
        Self::NoScopeAssigned
    }
}
