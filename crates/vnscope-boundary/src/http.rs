//! # HTTP Boundary Provider
//!
//! Fetches geometries from the boundary service:
//!
//! | Method | Path                          | Response            |
//! |--------|-------------------------------|---------------------|
//! | GET    | `/boundaries/{level}/{code}`  | [`BoundaryPayload`] |
//!
//! `level` is `province` or `ward`. Status mapping: 404 is
//! [`ProviderError::NotFound`], 5xx and 429 are transient, other 4xx are
//! rejections. A client-side timeout maps to [`ProviderError::Timeout`].
//!
//! This provider performs a single attempt per call; retries and the
//! overall fetch bound live in [`crate::BoundaryResolver`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;
use vnscope_core::{BoundaryGeometry, BoundaryLevel, BoundingBox, GeoPolygon};
use zeroize::Zeroizing;

use crate::error::ProviderError;
use crate::provider::BoundaryProvider;

/// Wire shape of a boundary response.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundaryPayload {
    #[serde(default)]
    pub name: Option<String>,
    /// Provider-computed extent; widened to cover the rings.
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    pub polygons: Vec<GeoPolygon>,
}

/// Connection settings for [`HttpBoundaryProvider`].
///
/// Custom `Debug` redacts the token.
#[derive(Clone)]
pub struct HttpProviderConfig {
    pub base_url: Url,
    pub api_token: Option<Zeroizing<String>>,
    /// Per-request client timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for HttpProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpProviderConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Errors building the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("boundary API token is not a valid header value")]
    InvalidToken,
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// [`BoundaryProvider`] backed by the boundary REST service.
#[derive(Debug, Clone)]
pub struct HttpBoundaryProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBoundaryProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ClientError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn boundary_url(&self, level: BoundaryLevel, code: u32) -> String {
        format!("{}/boundaries/{}/{code}", self.base_url, level.as_str())
    }
}

#[async_trait]
impl BoundaryProvider for HttpBoundaryProvider {
    async fn fetch_boundary(
        &self,
        level: BoundaryLevel,
        code: u32,
    ) -> Result<BoundaryGeometry, ProviderError> {
        let url = self.boundary_url(level, code);
        let resp = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Transient(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound { level, code });
        }
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::Transient(format!(
                "GET {url} returned {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
            });
        }

        let payload: BoundaryPayload = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })?;

        let mut geometry = BoundaryGeometry::new(level, code, payload.name, payload.polygons)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        // A supplied bbox may only widen the computed one; containment
        // pre-filters on it.
        if let Some(bbox) = payload.bbox {
            geometry.bbox = geometry.bbox.union(&bbox);
        }
        tracing::debug!(%level, code, parts = geometry.polygons.len(), "fetched boundary");
        Ok(geometry)
    }
}
