//! # Jurisdiction Scope
//!
//! The immutable description of what a principal may see. A scope is
//! derived once per authenticated session from the identity provider's
//! profile tuple and never from caller-supplied claims.
//!
//! ## Derivation
//!
//! | Role       | Codes present            | Scope                        |
//! |------------|--------------------------|------------------------------|
//! | `admin`    | any                      | `National { is_admin: true }` |
//! | `central`  | any                      | `National { is_admin: false }` |
//! | `province` | province                 | `Province`                   |
//! | `ward`     | province + ward          | `Ward`                       |
//! | otherwise  | required code missing    | `Unassigned`                 |
//!
//! A ward officer missing a ward code is never widened to province scope:
//! incomplete assignments collapse to `Unassigned`, which every check denies.

use serde::{Deserialize, Serialize};

use crate::identity::{ProvinceCode, UserId, WardCode};

/// Account role as stored by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator; bypasses every location check.
    Admin,
    /// Nationwide officer without administrative bypass.
    Central,
    /// Officer assigned to one province.
    Province,
    /// Officer assigned to one ward.
    Ward,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Central => "central",
            Self::Province => "province",
            Self::Ward => "ward",
        }
    }
}

/// The identity provider's view of a user: `{ userId, role, provinceCode, wardCode }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub role: Role,
    #[serde(default)]
    pub province_code: Option<ProvinceCode>,
    #[serde(default)]
    pub ward_code: Option<WardCode>,
}

/// Granularity of a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeLevel {
    Ward,
    Province,
    National,
}

impl ScopeLevel {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ward => "ward",
            Self::Province => "province",
            Self::National => "national",
        }
    }
}

impl std::fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Administrative level a boundary geometry is published at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryLevel {
    Province,
    Ward,
}

impl BoundaryLevel {
    /// The canonical string name, also used as the provider path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Province => "province",
            Self::Ward => "ward",
        }
    }
}

impl std::fmt::Display for BoundaryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a principal may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope_level", rename_all = "snake_case")]
pub enum JurisdictionScope {
    /// Nationwide access. `is_admin` additionally grants the admin bypass.
    National { is_admin: bool },
    /// Restricted to one province.
    Province { province_code: ProvinceCode },
    /// Restricted to one ward of one province.
    Ward {
        province_code: ProvinceCode,
        ward_code: WardCode,
    },
    /// The account has no usable jurisdiction and is not an admin.
    Unassigned,
}

impl JurisdictionScope {
    /// Administrator scope.
    pub fn admin() -> Self {
        Self::National { is_admin: true }
    }

    /// Nationwide scope without admin bypass.
    pub fn national() -> Self {
        Self::National { is_admin: false }
    }

    /// Province scope.
    pub fn province(province_code: ProvinceCode) -> Self {
        Self::Province { province_code }
    }

    /// Ward scope.
    pub fn ward(province_code: ProvinceCode, ward_code: WardCode) -> Self {
        Self::Ward {
            province_code,
            ward_code,
        }
    }

    /// Derive the scope from an identity-provider profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        match (profile.role, profile.province_code, profile.ward_code) {
            (Role::Admin, _, _) => Self::admin(),
            (Role::Central, _, _) => Self::national(),
            (Role::Province, Some(province), _) => Self::province(province),
            (Role::Ward, Some(province), Some(ward)) => Self::ward(province, ward),
            (Role::Province, None, _) | (Role::Ward, _, _) => Self::Unassigned,
        }
    }

    /// Scope level, or `None` when nothing is assigned.
    pub fn level(&self) -> Option<ScopeLevel> {
        match self {
            Self::National { .. } => Some(ScopeLevel::National),
            Self::Province { .. } => Some(ScopeLevel::Province),
            Self::Ward { .. } => Some(ScopeLevel::Ward),
            Self::Unassigned => None,
        }
    }

    /// Whether the admin bypass applies.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::National { is_admin: true })
    }

    /// Assigned province, if any.
    pub fn province_code(&self) -> Option<ProvinceCode> {
        match self {
            Self::Province { province_code } | Self::Ward { province_code, .. } => {
                Some(*province_code)
            }
            Self::National { .. } | Self::Unassigned => None,
        }
    }

    /// Assigned ward, if any.
    pub fn ward_code(&self) -> Option<WardCode> {
        match self {
            Self::Ward { ward_code, .. } => Some(*ward_code),
            Self::National { .. } | Self::Province { .. } | Self::Unassigned => None,
        }
    }

    /// The boundary that geometrically bounds this scope.
    ///
    /// `None` for national scope (no restriction) and for unassigned scope
    /// (callers must deny before asking for geometry).
    pub fn boundary_key(&self) -> Option<(BoundaryLevel, u32)> {
        match self {
            Self::Province { province_code } => Some((BoundaryLevel::Province, province_code.get())),
            Self::Ward { ward_code, .. } => Some((BoundaryLevel::Ward, ward_code.get())),
            Self::National { .. } | Self::Unassigned => None,
        }
    }

    /// Human-readable scope label.
    pub fn label(&self) -> String {
        match self {
            Self::National { is_admin: true } => "Nationwide (administrator)".to_string(),
            Self::National { is_admin: false } => "Nationwide".to_string(),
            Self::Province { province_code } => format!("Province {province_code}"),
            Self::Ward {
                province_code,
                ward_code,
            } => format!("Ward {ward_code}, Province {province_code}"),
            Self::Unassigned => "No jurisdiction assigned".to_string(),
        }
    }
}
