//! # Identity Newtypes
//!
//! Administrative division codes and user identifiers. Vietnam's province
//! and ward codes are positive integers assigned by the General Statistics
//! Office; ward codes are unique nationwide.
//!
//! Deserialization routes through the validating constructors, so a zero
//! or negative code can never enter the system through JSON.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A province (tỉnh / thành phố) code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProvinceCode(u32);

impl ProvinceCode {
    /// Create a province code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProvinceCode`] for zero, negative,
    /// or out-of-range values.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(ValidationError::InvalidProvinceCode(value)),
        }
    }

    /// The numeric code.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ProvinceCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ProvinceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ward (phường / xã) code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WardCode(u32);

impl WardCode {
    /// Create a ward code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidWardCode`] for zero, negative, or
    /// out-of-range values.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(ValidationError::InvalidWardCode(value)),
        }
    }

    /// The numeric code.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for WardCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for WardCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verified user identifier supplied by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUserId`] if nothing remains after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(Self(trimmed))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn province_code_rejects_zero_and_negative() {
        assert!(ProvinceCode::new(0).is_err());
        assert!(ProvinceCode::new(-17).is_err());
        assert_eq!(ProvinceCode::new(17).unwrap().get(), 17);
    }

    #[test]
    fn ward_code_rejects_out_of_range() {
        assert!(WardCode::new(i64::from(u32::MAX) + 1).is_err());
        assert_eq!(WardCode::new(19051).unwrap().get(), 19051);
    }

    #[test]
    fn codes_deserialize_through_validation() {
        let ok: WardCode = serde_json::from_str("19051").unwrap();
        assert_eq!(ok.get(), 19051);
        assert!(serde_json::from_str::<WardCode>("0").is_err());
        assert!(serde_json::from_str::<ProvinceCode>("-1").is_err());
    }

    #[test]
    fn user_id_trims_and_rejects_blank() {
        assert_eq!(UserId::new("  officer-7 ").unwrap().as_str(), "officer-7");
        assert!(UserId::new("   ").is_err());
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }

    #[test]
    fn display_prints_raw_value() {
        assert_eq!(format!("{}", ProvinceCode::new(1).unwrap()), "1");
        assert_eq!(format!("{}", UserId::new("u1").unwrap()), "u1");
    }
}
