//! # API Route Modules
//!
//! - `scope`: the caller's jurisdiction for presentation (label, filter,
//!   extent, boundary and mask).
//! - `access`: point, polygon and location-code access decisions.
//! - `submissions`: survey intake: validation and storage.
//! - `records`: scope-filtered listing of stored survey records.

pub mod access;
pub mod records;
pub mod scope;
pub mod submissions;
