//! Process-wide boundary cache.
//!
//! Geometries are immutable reference data: entries are written once per
//! `(level, code)` and never invalidated. Two tasks filling the same key
//! concurrently both store the same geometry, so the race is harmless.
//! The cache is an explicit object shared through `Arc` and injected into
//! the resolver; there is no global instance.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use vnscope_core::{BoundaryGeometry, BoundaryLevel};

type Key = (BoundaryLevel, u32);

#[derive(Debug, Default)]
pub struct BoundaryCache {
    entries: RwLock<HashMap<Key, Arc<BoundaryGeometry>>>,
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: BoundaryLevel, code: u32) -> Option<Arc<BoundaryGeometry>> {
        self.entries.read().get(&(level, code)).cloned()
    }

    /// Store a geometry under the key it was requested for and return the
    /// shared handle.
    pub fn insert(
        &self,
        level: BoundaryLevel,
        code: u32,
        geometry: BoundaryGeometry,
    ) -> Arc<BoundaryGeometry> {
        let geometry = Arc::new(geometry);
        self.entries.write().insert((level, code), Arc::clone(&geometry));
        geometry
    }

    pub fn contains(&self, level: BoundaryLevel, code: u32) -> bool {
        self.entries.read().contains_key(&(level, code))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
