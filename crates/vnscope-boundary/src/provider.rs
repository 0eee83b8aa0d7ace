//! # Boundary Provider Contract
//!
//! The external geometry source is reached through [`BoundaryProvider`].
//! The resolver depends only on this trait, so production wiring uses
//! [`crate::HttpBoundaryProvider`] while tests and offline deployments use
//! [`crate::StaticBoundaryProvider`] or purpose-built fakes.

use async_trait::async_trait;
use vnscope_core::{BoundaryGeometry, BoundaryLevel};

use crate::error::ProviderError;

/// Source of authoritative ward and province geometries.
#[async_trait]
pub trait BoundaryProvider: Send + Sync {
    /// Fetch the boundary published for `(level, code)`.
    async fn fetch_boundary(
        &self,
        level: BoundaryLevel,
        code: u32,
    ) -> Result<BoundaryGeometry, ProviderError>;
}
