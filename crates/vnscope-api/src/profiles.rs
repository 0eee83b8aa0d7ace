//! # Profile Directory
//!
//! Server-side copy of the identity provider's user assignments
//! (`{ user_id, role, province_code, ward_code }`). The caller's scope is
//! always derived from this directory, never from request content.
//!
//! Loaded from the JSON array at `VNSCOPE_PROFILES_FILE`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use vnscope_core::{UserId, UserProfile};

#[derive(Debug, thiserror::Error)]
pub enum ProfileLoadError {
    #[error("failed to read profile file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse profiles: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct ProfileDirectory {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let directory = Self::new();
        for profile in profiles {
            directory.insert(profile);
        }
        directory
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProfileLoadError> {
        let profiles: Vec<UserProfile> = serde_json::from_str(json)?;
        Ok(Self::from_profiles(profiles))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProfileLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), profiles = directory.len(), "loaded user profiles");
        Ok(directory)
    }

    /// Add or replace a profile.
    pub fn insert(&self, profile: UserProfile) {
        self.profiles.write().insert(profile.user_id.clone(), profile);
    }

    pub fn get(&self, user_id: &UserId) -> Option<UserProfile> {
        self.profiles.read().get(user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}
