//! Boundary provider and resolver error types.

use std::path::PathBuf;

use vnscope_core::{BoundaryLevel, GeometryError};

/// Failure reported by a [`crate::BoundaryProvider`] for one fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The provider has no geometry for this key.
    #[error("no {level} boundary with code {code}")]
    NotFound { level: BoundaryLevel, code: u32 },
    /// Transport failure or 5xx response; worth retrying.
    #[error("transient provider failure: {0}")]
    Transient(String),
    /// The request did not complete within the fetch timeout.
    #[error("boundary request timed out")]
    Timeout,
    /// The provider refused the request (4xx other than 404).
    #[error("provider rejected request with status {status}")]
    Rejected { status: u16 },
    /// The response could not be turned into a boundary.
    #[error("malformed boundary payload: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Timeout)
    }
}

/// Errors surfaced by [`crate::BoundaryResolver`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundaryError {
    /// Provider miss, refusal, or exhausted retries. Callers deny.
    #[error("{level} boundary {code} unavailable: {reason}")]
    Unavailable {
        level: BoundaryLevel,
        code: u32,
        reason: String,
    },
    /// The scope carries no jurisdiction to resolve.
    #[error("no jurisdiction assigned")]
    NoScopeAssigned,
}

/// Failure loading a static boundary set.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse boundary data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{level} boundary {code} is invalid: {source}")]
    Geometry {
        level: BoundaryLevel,
        code: u32,
        source: GeometryError,
    },
}
