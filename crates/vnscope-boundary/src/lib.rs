//! # vnscope-boundary — Jurisdiction Geometry
//!
//! Resolves ward and province scopes into authoritative boundary
//! geometries and derives the outside-jurisdiction mask.
//!
//! ## Components
//!
//! - [`BoundaryProvider`]: the external geometry source contract, with an
//!   HTTP implementation ([`HttpBoundaryProvider`]) and an in-memory one
//!   ([`StaticBoundaryProvider`]).
//! - [`BoundaryCache`]: process-lifetime cache keyed by `(level, code)`,
//!   injected into the resolver.
//! - [`BoundaryResolver`]: cache-first resolution with bounded retries and
//!   fail-closed [`BoundaryError::Unavailable`].
//! - [`MaskBuilder`]: complement geometry for the presentation layer.

pub mod cache;
pub mod error;
pub mod http;
pub mod mask;
pub mod provider;
pub mod resolver;
pub mod static_provider;

pub use cache::BoundaryCache;
pub use error::{BoundaryError, LoadError, ProviderError};
pub use http::{ClientError, HttpBoundaryProvider, HttpProviderConfig};
pub use mask::{build_mask, MaskBuilder, MASK_PADDING_DEGREES};
pub use provider::BoundaryProvider;
pub use resolver::{AllowedRegion, BoundaryResolver, ResolverConfig};
pub use static_provider::{BoundaryRecord, StaticBoundaryProvider};
