use crate::config::DuplicatePolicy;
use crate::errors::{Result, TrackingError};
use crate::features::mapping::IndexConfiguration;
use crate::shared::models::EntityName;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::warn;

/// Index configurations by entity and by index name
#[derive(Debug, Default, Clone)]
pub struct IndexCatalog {
    by_entity: FxHashMap<EntityName, Arc<IndexConfiguration>>,
    by_index: FxHashMap<String, Arc<IndexConfiguration>>,
    affected: FxHashSet<EntityName>,
    /// Registration order
    ordered: Vec<Arc<IndexConfiguration>>,
    policy: DuplicatePolicy,
}

impl IndexCatalog {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Register a configuration, returning `false` when it was dropped as a
    /// duplicate under [`DuplicatePolicy::Warn`]
    pub fn register(&mut self, config: IndexConfiguration) -> Result<bool> {
        let entity = config.entity_name().clone();

        let existing = self
            .by_entity
            .get(&entity)
            .or_else(|| self.by_index.get(config.index_name()));
        if let Some(existing) = existing {
            match self.policy {
                DuplicatePolicy::Warn => {
                    warn!(
                        "Multiple index definitions detected for entity '{}' (index '{}'), \
                         keeping index '{}' of '{}'",
                        entity,
                        config.index_name(),
                        existing.index_name(),
                        existing.entity_name()
                    );
                    return Ok(false);
                }
                DuplicatePolicy::Reject => {
                    return Err(TrackingError::DuplicateDefinition {
                        entity: entity.to_string(),
                        index_name: config.index_name().to_string(),
                    });
                }
            }
        }

        let config = Arc::new(config);
        self.affected
            .extend(config.affected_entity_types().iter().cloned());
        self.by_index
            .insert(config.index_name().to_string(), Arc::clone(&config));
        self.by_entity.insert(entity, Arc::clone(&config));
        self.ordered.push(config);
        Ok(true)
    }

    /// Mark entity types reached by effective mapping paths as affected
    pub(crate) fn extend_affected(&mut self, types: impl IntoIterator<Item = EntityName>) {
        self.affected.extend(types);
    }

    pub fn by_entity_name(&self, entity: &str) -> Option<&IndexConfiguration> {
        self.by_entity.get(entity).map(Arc::as_ref)
    }

    pub fn by_index_name(&self, index_name: &str) -> Option<&IndexConfiguration> {
        self.by_index.get(index_name).map(Arc::as_ref)
    }

    /// Whether `entity` is a root type with its own index
    pub fn is_directly_indexed(&self, entity: &str) -> bool {
        self.by_entity.contains_key(entity)
    }

    /// Whether `entity` is a root type or appears on any mapping path
    pub fn is_affected(&self, entity: &str) -> bool {
        self.affected.contains(entity)
    }

    /// All configurations in registration order
    pub fn index_configurations(&self) -> impl Iterator<Item = &IndexConfiguration> {
        self.ordered.iter().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::mapping::MappingFieldDescriptor;
    use crate::shared::models::{Cardinality, MetaProperty, PropertyPath};

    fn order_index(index_name: &str) -> IndexConfiguration {
        let path = PropertyPath::root_of("Order").child(MetaProperty::reference(
            "Order",
            "customer",
            "Customer",
            Cardinality::One,
        ));
        IndexConfiguration::new("Order", index_name, [MappingFieldDescriptor::new(path)]).unwrap()
    }

    #[test]
    fn test_lookup_by_entity_and_index() {
        let mut catalog = IndexCatalog::new(DuplicatePolicy::Warn);
        assert!(catalog.register(order_index("search_index_order")).unwrap());

        assert_eq!(
            catalog.by_entity_name("Order").unwrap().index_name(),
            "search_index_order"
        );
        assert_eq!(
            catalog.by_index_name("search_index_order").unwrap().entity_name().as_str(),
            "Order"
        );
        assert!(catalog.by_entity_name("Customer").is_none());
        assert!(catalog.by_index_name("missing").is_none());
    }

    #[test]
    fn test_directly_indexed_vs_affected() {
        let mut catalog = IndexCatalog::new(DuplicatePolicy::Warn);
        catalog.register(order_index("search_index_order")).unwrap();

        assert!(catalog.is_directly_indexed("Order"));
        assert!(!catalog.is_directly_indexed("Customer"));
        assert!(catalog.is_affected("Order"));
        assert!(catalog.is_affected("Customer"));
        assert!(!catalog.is_affected("Invoice"));
    }

    #[test]
    fn test_duplicate_kept_first_under_warn() {
        let mut catalog = IndexCatalog::new(DuplicatePolicy::Warn);
        assert!(catalog.register(order_index("first")).unwrap());
        assert!(!catalog.register(order_index("second")).unwrap());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.by_entity_name("Order").unwrap().index_name(), "first");
        assert!(catalog.by_index_name("second").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = IndexCatalog::new(DuplicatePolicy::Reject);
        catalog.register(order_index("first")).unwrap();

        let err = catalog.register(order_index("second")).unwrap_err();
        assert!(matches!(err, TrackingError::DuplicateDefinition { .. }));
    }
}
