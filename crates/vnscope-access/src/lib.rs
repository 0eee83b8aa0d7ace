//! # vnscope-access — Jurisdiction Authorization
//!
//! Decides whether a principal may see or submit data at a location.
//!
//! - [`AccessEvaluator`] / [`can_access_location`]: code and geometry
//!   checks with strict role precedence and admin bypass.
//! - [`build_filter`]: the same decision expressed as a data-store row
//!   predicate.
//! - [`ValidationFacade`]: ordered, first-failure submission validation.
//! - [`spawn_scoped_relay`] / [`filter_batch`]: re-filtering of pushed
//!   updates that bypass the query-time row filter.
//!
//! All checks are fail-closed: unassigned scopes, missing boundaries, and
//! malformed geometry deny.

pub mod decision;
pub mod evaluator;
pub mod filter;
pub mod realtime;
pub mod validation;

pub use decision::{AccessDecision, AccessReason};
pub use evaluator::{can_access_location, AccessEvaluator};
pub use filter::{build_filter, LocationFilter, NoScopeAssigned};
pub use realtime::{filter_batch, spawn_scoped_relay, LocationTagged};
pub use validation::{Submission, ValidationError, ValidationFacade};
