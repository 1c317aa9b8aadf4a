use crate::errors::{Result, TrackingError};
use crate::shared::models::{EntityName, PropertyPath};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One document field of one root entity type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MappingFieldDescriptor {
    pub field_name: String,
    pub property_path: PropertyPath,
    /// Value supplied by code rather than derived from `property_path`;
    /// excluded from dependency compilation
    pub standalone: bool,
}

impl MappingFieldDescriptor {
    /// Field named after its dotted property path
    pub fn new(property_path: PropertyPath) -> Self {
        Self {
            field_name: property_path.dotted(),
            property_path,
            standalone: false,
        }
    }

    pub fn standalone(field_name: impl Into<String>, property_path: PropertyPath) -> Self {
        Self {
            field_name: field_name.into(),
            property_path,
            standalone: true,
        }
    }
}

/// Index configuration of one directly indexed entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexConfiguration {
    entity_name: EntityName,
    index_name: String,
    fields: BTreeMap<String, MappingFieldDescriptor>,
    /// Root plus every reference target crossed by any field path
    affected_entity_types: BTreeSet<EntityName>,
}

impl IndexConfiguration {
    pub fn new(
        entity_name: impl Into<EntityName>,
        index_name: impl Into<String>,
        fields: impl IntoIterator<Item = MappingFieldDescriptor>,
    ) -> Result<Self> {
        let entity_name = entity_name.into();
        let mut affected_entity_types = BTreeSet::from([entity_name.clone()]);
        let mut by_name = BTreeMap::new();

        for field in fields {
            if field.property_path.is_empty() {
                return Err(TrackingError::EmptyPath(entity_name.to_string()));
            }
            if field.property_path.root() != &entity_name {
                return Err(TrackingError::ForeignRoot {
                    entity: entity_name.to_string(),
                    field: field.field_name,
                    path_root: field.property_path.root().to_string(),
                });
            }

            affected_entity_types.extend(
                field
                    .property_path
                    .hops()
                    .iter()
                    .filter_map(|hop| hop.range.reference_target().cloned()),
            );
            match by_name.get(&field.field_name) {
                Some(existing) if existing != &field => {
                    return Err(TrackingError::DuplicateField {
                        entity: entity_name.to_string(),
                        field: field.field_name,
                    });
                }
                Some(_) => continue,
                None => {}
            }
            by_name.insert(field.field_name.clone(), field);
        }

        Ok(Self {
            entity_name,
            index_name: index_name.into(),
            fields: by_name,
            affected_entity_types,
        })
    }

    pub fn entity_name(&self) -> &EntityName {
        &self.entity_name
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn fields(&self) -> impl Iterator<Item = &MappingFieldDescriptor> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&MappingFieldDescriptor> {
        self.fields.get(name)
    }

    /// Fields taking part in dependency compilation
    pub fn tracked_fields(&self) -> impl Iterator<Item = &MappingFieldDescriptor> {
        self.fields.values().filter(|field| !field.standalone)
    }

    pub fn affected_entity_types(&self) -> &BTreeSet<EntityName> {
        &self.affected_entity_types
    }
}
