//! Identity cache.

use crate::entity::{Identity, SharedEntity};
use std::collections::HashMap;

/// Maps each remote identity to its single live instance.
///
/// The cache is unbounded and lives as long as its owning manager.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: HashMap<Identity, SharedEntity>,
}

impl IdentityCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance of `entity_type`/`id`.
    pub fn get(&self, entity_type: &str, id: u64) -> Option<SharedEntity> {
        self.entries.get(&Identity::new(entity_type, id)).cloned()
    }

    /// Caches `entity` as the live instance of `entity_type`/`id`.
    ///
    /// Returns the instance it replaced, if any.
    pub fn put(
        &mut self,
        entity_type: &str,
        id: u64,
        entity: SharedEntity,
    ) -> Option<SharedEntity> {
        self.entries.insert(Identity::new(entity_type, id), entity)
    }

    /// Removes the cached instance of `entity_type`/`id`.
    pub fn remove(&mut self, entity_type: &str, id: u64) -> Option<SharedEntity> {
        self.entries.remove(&Identity::new(entity_type, id))
    }

    /// Returns true if `entity_type`/`id` is cached.
    pub fn contains(&self, entity_type: &str, id: u64) -> bool {
        self.entries.contains_key(&Identity::new(entity_type, id))
    }

    /// Returns the number of cached entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached instance.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
