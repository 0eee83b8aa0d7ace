//! In-memory boundary provider, optionally loaded from a JSON file.
//!
//! File format: an array of records
//!
//! ```json
//! [{ "level": "ward", "code": 19051, "name": "Phường Quang Trung",
//!    "polygons": [[[{"lat": 21.0, "lng": 105.8}, ...]]] }]
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vnscope_core::{BoundaryGeometry, BoundaryLevel, GeoPolygon};

use crate::error::{LoadError, ProviderError};
use crate::provider::BoundaryProvider;

/// One entry of a boundary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryRecord {
    pub level: BoundaryLevel,
    pub code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub polygons: Vec<GeoPolygon>,
}

impl BoundaryRecord {
    /// Assemble the geometry, computing its bounding box.
    pub fn into_geometry(self) -> Result<BoundaryGeometry, LoadError> {
        let (level, code) = (self.level, self.code);
        BoundaryGeometry::new(level, code, self.name, self.polygons)
            .map_err(|source| LoadError::Geometry {
                level,
                code,
                source,
            })
    }
}

/// Fixed set of boundaries held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticBoundaryProvider {
    boundaries: HashMap<(BoundaryLevel, u32), BoundaryGeometry>,
}

impl StaticBoundaryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, geometry: BoundaryGeometry) -> Self {
        self.insert(geometry);
        self
    }

    /// Add or replace a boundary.
    pub fn insert(&mut self, geometry: BoundaryGeometry) {
        self.boundaries
            .insert((geometry.level, geometry.code), geometry);
    }

    pub fn from_records(records: Vec<BoundaryRecord>) -> Result<Self, LoadError> {
        let mut provider = Self::new();
        for record in records {
            provider.insert(record.into_geometry()?);
        }
        Ok(provider)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let records: Vec<BoundaryRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Load a boundary file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let provider = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            boundaries = provider.len(),
            "loaded static boundary set"
        );
        Ok(provider)
    }

    pub fn get(&self, level: BoundaryLevel, code: u32) -> Option<&BoundaryGeometry> {
        self.boundaries.get(&(level, code))
    }

    /// All boundaries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &BoundaryGeometry> {
        self.boundaries.values()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

#[async_trait]
impl BoundaryProvider for StaticBoundaryProvider {
    async fn fetch_boundary(
        &self,
        level: BoundaryLevel,
        code: u32,
    ) -> Result<BoundaryGeometry, ProviderError> {
        self.get(level, code)
            .cloned()
            .ok_or(ProviderError::NotFound { level, code })
    }
}
