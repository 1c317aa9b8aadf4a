// Ports: schema metamodel access consumed by mapping and tracking

use crate::shared::models::{EntityName, EntityType, MetaProperty};

/// Read-only view of entity types and their properties
///
/// Implementations are queried during the build phase only, so lookups may
/// be linear; the compiled registry never calls back into the schema.
pub trait SchemaModel: Send + Sync {
    /// Entity type descriptor by name
    fn entity(&self, name: &str) -> Option<&EntityType>;

    /// Names of every entity type known to the schema
    fn entity_names(&self) -> Vec<&EntityName>;

    /// Declared properties of an entity type (empty for unknown types)
    fn properties_of(&self, name: &str) -> &[MetaProperty] {
        self.entity(name)
            .map(|entity| entity.properties.as_slice())
            .unwrap_or(&[])
    }

    /// Properties composing the entity's human-readable instance name
    fn identity_properties_of(&self, name: &str) -> Vec<&MetaProperty> {
        self.entity(name)
            .map(|entity| entity.identity_properties().collect())
            .unwrap_or_default()
    }

    /// Single property lookup
    fn property(&self, entity: &str, property: &str) -> Option<&MetaProperty> {
        self.entity(entity).and_then(|e| e.property(property))
    }
}
