use super::catalog::IndexCatalog;
use super::registry::DependencyRegistry;
use crate::shared::models::{EntityName, PropertyPath};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Root entity type → back paths from that root to the changed instance
pub type ImpactSet = BTreeMap<EntityName, BTreeSet<PropertyPath>>;

/// Compiled, read-only view over the catalog and the registry
///
/// All queries are pure. An entity or property nobody tracks yields an empty
/// [`ImpactSet`], never an error.
#[derive(Debug, Default, Clone)]
pub struct DependencyResolver {
    catalog: IndexCatalog,
    registry: DependencyRegistry,
}

impl DependencyResolver {
    pub fn new(catalog: IndexCatalog, registry: DependencyRegistry) -> Self {
        Self { catalog, registry }
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.registry
    }

    /// Root documents to reindex after `properties` of an `entity` instance changed
    pub fn dependencies_for_update<I, S>(&self, entity: &str, properties: I) -> ImpactSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut impact = ImpactSet::new();
        for property in properties {
            let property = property.as_ref();
            for back_path in self.registry.back_refs_for_update(entity, property) {
                Self::add(&mut impact, back_path);
            }
        }
        debug!("Update of {} affects {} root types", entity, impact.len());
        impact
    }

    /// Root documents referencing an `entity` instance that is being deleted
    pub fn dependencies_for_delete(&self, entity: &str) -> ImpactSet {
        let mut impact = ImpactSet::new();
        for back_path in self.registry.back_refs_for_delete(entity) {
            Self::add(&mut impact, back_path);
        }
        debug!("Delete of {} affects {} root types", entity, impact.len());
        impact
    }

    fn add(impact: &mut ImpactSet, back_path: &PropertyPath) {
        impact
            .entry(back_path.root().clone())
            .or_default()
            .insert(back_path.clone());
    }
}

/// Published resolver snapshot shared between threads
///
/// Readers clone the current `Arc` and query it without holding the lock.
/// A rebuild compiles a new resolver elsewhere and swaps it in with
/// [`SharedResolver::publish`].
#[derive(Debug, Default)]
pub struct SharedResolver {
    current: RwLock<Arc<DependencyResolver>>,
}

impl SharedResolver {
    pub fn new(resolver: DependencyResolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
        }
    }

    pub fn snapshot(&self) -> Arc<DependencyResolver> {
        Arc::clone(&self.current.read())
    }

    /// Replace the published snapshot, returning the previous one
    pub fn publish(&self, resolver: DependencyResolver) -> Arc<DependencyResolver> {
        let next = Arc::new(resolver);
        std::mem::replace(&mut *self.current.write(), next)
    }
}
