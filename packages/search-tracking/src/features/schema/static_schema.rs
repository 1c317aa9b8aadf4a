use crate::errors::{Result, TrackingError};
use crate::shared::models::{Cardinality, EntityName, EntityType, MetaProperty, ScalarKind};
use crate::shared::ports::SchemaModel;
use rustc_hash::{FxHashMap, FxHashSet};

/// Immutable descriptor table implementing [`SchemaModel`]
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    entities: FxHashMap<EntityName, EntityType>,
}

impl StaticSchema {
    pub fn builder() -> StaticSchemaBuilder {
        StaticSchemaBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl SchemaModel for StaticSchema {
    fn entity(&self, name: &str) -> Option<&EntityType> {
        self.entities.get(name)
    }

    fn entity_names(&self) -> Vec<&EntityName> {
        let mut names: Vec<&EntityName> = self.entities.keys().collect();
        names.sort();
        names
    }
}

/// Collects entity descriptors and validates them as a whole
#[derive(Debug, Default)]
pub struct StaticSchemaBuilder {
    entities: Vec<EntityType>,
}

impl StaticSchemaBuilder {
    /// Declare an entity type
    ///
    /// ```rust,ignore
    /// let schema = StaticSchema::builder()
    ///     .entity("Order", |e| e.scalar("number", ScalarKind::String).reference("customer", "Customer"))
    ///     .entity("Customer", |e| e.scalar("name", ScalarKind::String).instance_name(["name"]))
    ///     .build()?;
    /// ```
    pub fn entity(mut self, name: &str, declare: impl FnOnce(EntityBuilder) -> EntityBuilder) -> Self {
        let builder = declare(EntityBuilder::new(name));
        self.entities.push(builder.finish());
        self
    }

    pub fn push(mut self, entity: EntityType) -> Self {
        self.entities.push(entity);
        self
    }

    /// Validate cross-entity references and freeze the table
    pub fn build(self) -> Result<StaticSchema> {
        let mut entities = FxHashMap::default();
        for entity in self.entities {
            if entities.contains_key(&entity.name) {
                return Err(TrackingError::invalid_schema(format!(
                    "entity '{}' declared twice",
                    entity.name
                )));
            }
            entities.insert(entity.name.clone(), entity);
        }

        for entity in entities.values() {
            validate_entity(entity, &entities)?;
        }

        Ok(StaticSchema { entities })
    }
}

fn validate_entity(entity: &EntityType, all: &FxHashMap<EntityName, EntityType>) -> Result<()> {
    let mut seen = FxHashSet::default();
    for property in &entity.properties {
        if !seen.insert(property.name.as_str()) {
            return Err(TrackingError::invalid_schema(format!(
                "property '{}' declared twice on entity '{}'",
                property.name, entity.name
            )));
        }
        if property.domain != entity.name {
            return Err(TrackingError::invalid_schema(format!(
                "property '{}' is listed on '{}' but owned by '{}'",
                property.name, entity.name, property.domain
            )));
        }
        if let Some(target) = property.range.reference_target() {
            if !all.contains_key(target) {
                return Err(TrackingError::invalid_schema(format!(
                    "property '{}' references unknown entity '{}'",
                    property, target
                )));
            }
        }
    }

    for name in &entity.instance_name {
        if entity.property(name).is_none() {
            return Err(TrackingError::invalid_schema(format!(
                "instance name of '{}' uses undeclared property '{}'",
                entity.name, name
            )));
        }
    }

    Ok(())
}

/// Property list of a single entity under construction
#[derive(Debug)]
pub struct EntityBuilder {
    name: EntityName,
    properties: Vec<MetaProperty>,
    instance_name: Vec<String>,
}

impl EntityBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: EntityName::new(name),
            properties: Vec::new(),
            instance_name: Vec::new(),
        }
    }

    pub fn scalar(mut self, name: &str, kind: ScalarKind) -> Self {
        self.properties
            .push(MetaProperty::scalar(self.name.clone(), name, kind));
        self
    }

    /// Single-valued reference
    pub fn reference(mut self, name: &str, target: &str) -> Self {
        self.properties.push(MetaProperty::reference(
            self.name.clone(),
            name,
            target,
            Cardinality::One,
        ));
        self
    }

    /// Collection-valued reference
    pub fn collection(mut self, name: &str, target: &str) -> Self {
        self.properties.push(MetaProperty::reference(
            self.name.clone(),
            name,
            target,
            Cardinality::Many,
        ));
        self
    }

    /// Identity-contributing properties
    pub fn instance_name<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.instance_name = names.into_iter().map(str::to_string).collect();
        self
    }

    fn finish(self) -> EntityType {
        EntityType {
            name: self.name,
            properties: self.properties,
            instance_name: self.instance_name,
        }
    }
}
