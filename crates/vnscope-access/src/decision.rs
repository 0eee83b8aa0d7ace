//! Access decision value returned by every check.

use serde::{Deserialize, Serialize};

/// Why a check allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessReason {
    AdminBypass,
    WithinScope,
    OutsideScope,
    NoScopeAssigned,
    InvalidGeometry,
    /// The scope's boundary could not be fetched; denied fail-closed.
    BoundaryUnavailable,
}

impl AccessReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminBypass => "admin_bypass",
            Self::WithinScope => "within_scope",
            Self::OutsideScope => "outside_scope",
            Self::NoScopeAssigned => "no_scope_assigned",
            Self::InvalidGeometry => "invalid_geometry",
            Self::BoundaryUnavailable => "boundary_unavailable",
        }
    }
}

impl std::fmt::Display for AccessReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    pub fn allow(reason: AccessReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn deny(reason: AccessReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
