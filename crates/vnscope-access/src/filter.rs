//! # Location Filter
//!
//! Row predicate handed to the data store so results arrive already
//! restricted to the caller's jurisdiction. The predicate has exactly the
//! evaluator's branches, so `filter.matches(p, w)` agrees with
//! [`crate::can_access_location`] for every assigned scope. Individual
//! records are still re-checked by the evaluator after the store returns
//! them.

use serde::{Deserialize, Serialize};
use vnscope_core::{JurisdictionScope, ProvinceCode, WardCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationFilter {
    /// No restriction.
    All,
    Province {
        province_code: ProvinceCode,
    },
    Ward {
        province_code: ProvinceCode,
        ward_code: WardCode,
    },
}

impl LocationFilter {
    /// Apply the predicate to a row's location codes.
    pub fn matches(&self, province: Option<ProvinceCode>, ward: Option<WardCode>) -> bool {
        match self {
            Self::All => true,
            Self::Province { province_code } => province == Some(*province_code),
            Self::Ward {
                province_code,
                ward_code,
            } => province == Some(*province_code) && ward == Some(*ward_code),
        }
    }
}

/// An unassigned scope has no filter; it is never widened to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no jurisdiction assigned")]
pub struct NoScopeAssigned;

/// Translate a scope into the store predicate.
pub fn build_filter(scope: &JurisdictionScope) -> Result<LocationFilter, NoScopeAssigned> {
    match scope {
        JurisdictionScope::National { .. } => Ok(LocationFilter::All),
        JurisdictionScope::Province { province_code } => Ok(LocationFilter::Province {
            province_code: *province_code,
        }),
        JurisdictionScope::Ward {
            province_code,
            ward_code,
        } => Ok(LocationFilter::Ward {
            province_code: *province_code,
            ward_code: *ward_code,
        }),
        JurisdictionScope::Unassigned => Err(NoScopeAssigned),
    }
}
