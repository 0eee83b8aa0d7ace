//! # Boundary Resolver
//!
//! Turns a [`JurisdictionScope`] into the geometry that bounds it.
//!
//! ## Resolution
//!
//! - National scope resolves to `None`: no geometric restriction. The
//!   cache is never consulted.
//! - Unassigned scope is an error; there is nothing to resolve.
//! - Ward and province scopes resolve through the cache, falling back to
//!   the provider on a miss.
//!
//! ## Failure Policy
//!
//! Each provider call is bounded by [`ResolverConfig::fetch_timeout`].
//! Transient failures and timeouts are retried with exponential backoff
//! (base delay doubled per attempt) up to [`ResolverConfig::max_attempts`]
//! total attempts. `NotFound` and rejections are final immediately. Any
//! final failure is [`BoundaryError::Unavailable`], which callers treat as
//! a denial: a scoped user is never widened to national access because
//! reference data is missing.

use std::sync::Arc;
use std::time::Duration;

use vnscope_core::{BoundaryGeometry, BoundaryLevel, BoundingBox, JurisdictionScope};

use crate::cache::BoundaryCache;
use crate::error::{BoundaryError, ProviderError};
use crate::provider::BoundaryProvider;

/// Resolver tunables.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Bound on a single provider call.
    pub fetch_timeout: Duration,
    /// Total attempts per resolution, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

/// Presentation view of a jurisdiction: what to center and fit a map on.
#[derive(Debug, Clone)]
pub struct AllowedRegion {
    pub scope: JurisdictionScope,
    pub label: String,
    /// `None` for national scope.
    pub bbox: Option<BoundingBox>,
    pub boundary: Option<Arc<BoundaryGeometry>>,
}

pub struct BoundaryResolver {
    provider: Arc<dyn BoundaryProvider>,
    cache: Arc<BoundaryCache>,
    config: ResolverConfig,
}

impl std::fmt::Debug for BoundaryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryResolver")
            .field("cached", &self.cache.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BoundaryResolver {
    pub fn new(
        provider: Arc<dyn BoundaryProvider>,
        cache: Arc<BoundaryCache>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    /// Resolver with a fresh cache and default tunables.
    pub fn with_provider(provider: Arc<dyn BoundaryProvider>) -> Self {
        Self::new(provider, Arc::new(BoundaryCache::new()), ResolverConfig::default())
    }

    pub fn cache(&self) -> &Arc<BoundaryCache> {
        &self.cache
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The geometry bounding `scope`, or `None` for national scope.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::NoScopeAssigned`] for an unassigned scope and
    /// [`BoundaryError::Unavailable`] when the provider cannot supply the
    /// boundary.
    pub async fn resolve(
        &self,
        scope: &JurisdictionScope,
    ) -> Result<Option<Arc<BoundaryGeometry>>, BoundaryError> {
        let (level, code) = match scope {
            JurisdictionScope::National { .. } => return Ok(None),
            JurisdictionScope::Unassigned => return Err(BoundaryError::NoScopeAssigned),
            JurisdictionScope::Province { .. } | JurisdictionScope::Ward { .. } => {
                match scope.boundary_key() {
                    Some(key) => key,
                    None => return Err(BoundaryError::NoScopeAssigned),
                }
            }
        };

        if let Some(cached) = self.cache.get(level, code) {
            return Ok(Some(cached));
        }

        let geometry = self.fetch_with_retry(level, code).await?;
        tracing::debug!(%level, code, "boundary cached");
        Ok(Some(self.cache.insert(level, code, geometry)))
    }

    /// Label, extent and geometry for presentation.
    pub async fn describe(&self, scope: &JurisdictionScope) -> Result<AllowedRegion, BoundaryError> {
        let boundary = self.resolve(scope).await?;
        let label = match boundary.as_ref().and_then(|b| b.name.as_deref()) {
            Some(name) => format!("{name} ({})", scope.label()),
            None => scope.label(),
        };
        Ok(AllowedRegion {
            scope: *scope,
            label,
            bbox: boundary.as_ref().map(|b| b.bbox),
            boundary,
        })
    }

    async fn fetch_with_retry(
        &self,
        level: BoundaryLevel,
        code: u32,
    ) -> Result<BoundaryGeometry, BoundaryError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut delay = self.config.base_delay;
        let mut attempt = 0;

        let last_error = loop {
            attempt += 1;
            let outcome = match tokio::time::timeout(
                self.config.fetch_timeout,
                self.provider.fetch_boundary(level, code),
            )
            .await
            {
                Ok(result) => result,
                Err(_elapsed) => Err(ProviderError::Timeout),
            };

            match outcome {
                Ok(geometry) if geometry.level != level || geometry.code != code => {
                    break ProviderError::Malformed(format!(
                        "requested {level} {code}, provider returned {} {}",
                        geometry.level, geometry.code
                    ));
                }
                Ok(geometry) => return Ok(geometry),
                Err(e) if !e.is_retryable() || attempt >= max_attempts => break e,
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        %level,
                        code,
                        "boundary fetch failed, retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
            }
        };

        tracing::warn!(
            %level,
            code,
            attempts = attempt,
            reason = %last_error,
            "boundary unavailable"
        );
        Err(BoundaryError::Unavailable {
            level,
            code,
            reason: last_error.to_string(),
        })
    }
}
