//! Reverse-dependency registry
//!
//! Two lookup tables keyed by the entity type that changes:
//! - update: (entity, property) → back paths to root documents
//! - delete: entity → back paths ending with a reference to it
//!
//! Back paths are sets, so registering the same fact twice is a no-op.

use super::tracking_entry::TrackingEntry;
use crate::shared::models::{EntityName, PropertyPath};
use rustc_hash::{FxHashMap, FxHashSet};

type BackPaths = FxHashSet<PropertyPath>;

/// Mutable accumulator used during the build phase only
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    update: FxHashMap<EntityName, FxHashMap<String, BackPaths>>,
    delete: FxHashMap<EntityName, BackPaths>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record both halves of a tracking entry
    pub fn insert(&mut self, entry: TrackingEntry) {
        let TrackingEntry { update, delete } = entry;

        self.update
            .entry(update.entity)
            .or_default()
            .entry(update.property)
            .or_default()
            .insert(update.back_path);

        if let Some(delete) = delete {
            self.delete
                .entry(delete.entity)
                .or_default()
                .insert(delete.back_path);
        }
    }

    pub fn build(self) -> DependencyRegistry {
        DependencyRegistry {
            update: self.update,
            delete: self.delete,
        }
    }
}

/// Immutable reverse-dependency tables
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DependencyRegistry {
    update: FxHashMap<EntityName, FxHashMap<String, BackPaths>>,
    delete: FxHashMap<EntityName, BackPaths>,
}

impl DependencyRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Back paths invalidated by a change of `property` on `entity`
    pub fn back_refs_for_update<'a>(
        &'a self,
        entity: &str,
        property: &str,
    ) -> impl Iterator<Item = &'a PropertyPath> + 'a {
        self.update
            .get(entity)
            .and_then(|by_property| by_property.get(property))
            .into_iter()
            .flatten()
    }

    /// Back paths invalidated by deleting an instance of `entity`
    pub fn back_refs_for_delete<'a>(
        &'a self,
        entity: &str,
    ) -> impl Iterator<Item = &'a PropertyPath> + 'a {
        self.delete.get(entity).into_iter().flatten()
    }

    /// Properties of `entity` with at least one update dependency, sorted
    pub fn tracked_properties(&self, entity: &str) -> Vec<&str> {
        let mut properties: Vec<&str> = self
            .update
            .get(entity)
            .map(|by_property| by_property.keys().map(String::as_str).collect())
            .unwrap_or_default();
        properties.sort_unstable();
        properties
    }

    /// Entity types with any update or delete dependency, sorted
    pub fn tracked_entities(&self) -> Vec<&EntityName> {
        let mut entities: Vec<&EntityName> = self
            .update
            .keys()
            .chain(self.delete.keys())
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();
        entities.sort_unstable();
        entities
    }

    /// Total number of (key, back path) facts
    pub fn len(&self) -> usize {
        let updates: usize = self
            .update
            .values()
            .flat_map(|by_property| by_property.values())
            .map(FxHashSet::len)
            .sum();
        let deletes: usize = self.delete.values().map(FxHashSet::len).sum();
        updates + deletes
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
