//! Memoized path lookups.
//!
//! Keyed by (original reference, scale). Stores hits and high-density misses;
//! other failures are never cached, so a missing baseline keeps reporting.
//! No shard lock is held while the filesystem is consulted: two threads racing
//! on the same key may both resolve, and the later insert wins with an
//! identical value.

use std::path::PathBuf;

use dashmap::DashMap;

use crate::error::ResolveError;
use crate::reference::AssetReference;
use crate::scale::ScaleFactor;

/// Thread-safe resolution cache.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<(AssetReference, ScaleFactor), Option<PathBuf>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Cached outcome, if any. `Some(None)` is a remembered miss.
    pub fn get(&self, reference: &AssetReference, scale: ScaleFactor) -> Option<Option<PathBuf>> {
        self.entries
            .get(&(reference.clone(), scale))
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, reference: &AssetReference, scale: ScaleFactor, path: Option<PathBuf>) {
        self.entries.insert((reference.clone(), scale), path);
    }

    /// Return the cached outcome or run `resolve` and remember it.
    pub fn get_or_insert_with(
        &self,
        reference: &AssetReference,
        scale: ScaleFactor,
        resolve: impl FnOnce() -> Result<PathBuf, ResolveError>,
    ) -> Result<PathBuf, ResolveError> {
        match self.get(reference, scale) {
            Some(Some(path)) => return Ok(path),
            Some(None) => {
                return Err(ResolveError::NotFound {
                    reference: reference.clone(),
                    scale,
                    tried: Vec::new(),
                });
            }
            None => {}
        }

        let result = resolve();
        match &result {
            Ok(path) => self.insert(reference, scale, Some(path.clone())),
            Err(ResolveError::NotFound { .. }) => self.insert(reference, scale, None),
            Err(_) => {}
        }
        result
    }

    pub fn invalidate(&self, reference: &AssetReference) {
        self.entries.retain(|(cached, _), _| cached != reference);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
