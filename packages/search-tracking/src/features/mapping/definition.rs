//! Index definition YAML (v1) and its resolution against the schema
//!
//! ```yaml
//! version: 1
//! indexes:
//!   - entity: sales_Order
//!     include: [number, "customer", "lines.*"]
//!     exclude: ["lines.internalNote"]
//!     standalone:
//!       - { field: _instance_name, path: number }
//! ```
//!
//! `*` as the last segment selects every property of the type reached so
//! far. Exclusions drop every included path equal to or below them.

use super::descriptor::{IndexConfiguration, MappingFieldDescriptor};
use crate::config::{ConfigError, TrackingConfig};
use crate::errors::{Result, TrackingError};
use crate::shared::models::{EntityName, MetaProperty, PropertyPath};
use crate::shared::ports::SchemaModel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexDefinitionsFileV1 {
    pub version: Option<u32>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

/// Declarative index definition of one root entity type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexDefinition {
    pub entity: String,
    /// Defaults to `index_name_prefix` + lowercase entity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub standalone: Vec<StandaloneField>,
}

/// Field whose value is produced by code from the given path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandaloneField {
    pub field: String,
    pub path: String,
}

impl IndexDefinition {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    /// Builder: add included paths
    pub fn include<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.include.extend(paths.into_iter().map(str::to_string));
        self
    }

    /// Builder: add excluded paths
    pub fn exclude<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.exclude.extend(paths.into_iter().map(str::to_string));
        self
    }

    /// Builder: add a standalone field
    pub fn standalone(mut self, field: &str, path: &str) -> Self {
        self.standalone.push(StandaloneField {
            field: field.to_string(),
            path: path.to_string(),
        });
        self
    }

    /// Builder: set an explicit index name
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }
}

/// Load index definitions from YAML file (v1 schema)
pub fn load_index_definitions(path: impl AsRef<Path>) -> Result<Vec<IndexDefinition>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    debug!("Loading index definitions from {}", path.as_ref().display());
    parse_index_definitions(&content)
}

/// Parse index definitions from YAML text (v1 schema)
pub fn parse_index_definitions(content: &str) -> Result<Vec<IndexDefinition>> {
    let file: IndexDefinitionsFileV1 = serde_yaml::from_str(content)?;
    ConfigError::check_version(file.version)?;
    Ok(file.indexes)
}

/// Resolves dotted paths of index definitions into typed property paths
pub struct IndexDefinitionProcessor<'a> {
    schema: &'a dyn SchemaModel,
    config: &'a TrackingConfig,
}

impl<'a> IndexDefinitionProcessor<'a> {
    pub fn new(schema: &'a dyn SchemaModel, config: &'a TrackingConfig) -> Self {
        Self { schema, config }
    }

    pub fn create_index_configuration(
        &self,
        definition: &IndexDefinition,
    ) -> Result<IndexConfiguration> {
        let entity = definition.entity.as_str();
        if self.schema.entity(entity).is_none() {
            return Err(TrackingError::UnknownEntity(entity.to_string()));
        }

        let mut included = Vec::new();
        for dotted in &definition.include {
            included.extend(self.resolve(entity, dotted)?);
        }

        let mut excluded = Vec::new();
        for dotted in &definition.exclude {
            excluded.extend(self.resolve(entity, dotted)?);
        }
        included.retain(|path| !excluded.iter().any(|prefix| path.starts_with(prefix)));

        let mut fields: Vec<MappingFieldDescriptor> =
            included.into_iter().map(MappingFieldDescriptor::new).collect();

        for standalone in &definition.standalone {
            for path in self.resolve(entity, &standalone.path)? {
                fields.push(MappingFieldDescriptor::standalone(
                    standalone.field.as_str(),
                    path,
                ));
            }
        }

        let index_name = definition
            .index_name
            .clone()
            .unwrap_or_else(|| self.config.default_index_name(entity));

        debug!(
            "Index definition for '{}' resolved to {} fields (index '{}')",
            entity,
            fields.len(),
            index_name
        );

        IndexConfiguration::new(entity, index_name, fields)
    }

    /// Resolve one dotted path against the schema, expanding a trailing `*`
    pub fn resolve(&self, root: &str, dotted: &str) -> Result<Vec<PropertyPath>> {
        let segments: Vec<&str> = dotted.split('.').map(str::trim).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(TrackingError::EmptyPath(root.to_string()));
        }
        let Some((last, prefix)) = segments.split_last() else {
            return Err(TrackingError::EmptyPath(root.to_string()));
        };

        let mut path = PropertyPath::root_of(root);
        for segment in prefix {
            let hop = self.lookup(&path, segment, dotted)?;
            if !hop.is_reference() {
                return Err(TrackingError::NotAReference {
                    entity: hop.domain.to_string(),
                    property: hop.name.clone(),
                    path: dotted.to_string(),
                });
            }
            path = path.child(hop);
        }

        if *last == WILDCARD {
            let owner = self.reached(&path, dotted)?;
            return Ok(self
                .schema
                .properties_of(owner.as_str())
                .iter()
                .map(|hop| path.child(hop.clone()))
                .collect());
        }

        let hop = self.lookup(&path, last, dotted)?;
        Ok(vec![path.child(hop)])
    }

    fn reached(&self, path: &PropertyPath, dotted: &str) -> Result<EntityName> {
        if let Some(owner) = path.reached_type() {
            return Ok(owner.clone());
        }
        let hop = path
            .last()
            .ok_or_else(|| TrackingError::EmptyPath(path.root().to_string()))?;
        Err(TrackingError::NotAReference {
            entity: hop.domain.to_string(),
            property: hop.name.clone(),
            path: dotted.to_string(),
        })
    }

    fn lookup(
        &self,
        path: &PropertyPath,
        name: &str,
        dotted: &str,
    ) -> Result<MetaProperty> {
        let owner = self.reached(path, dotted)?;
        let Some(entity) = self.schema.entity(owner.as_str()) else {
            return Err(TrackingError::UnknownEntity(owner.to_string()));
        };
        if name == WILDCARD {
            return Err(TrackingError::unknown_property(
                owner.as_str(),
                format!("{} (wildcard is only allowed as the last segment)", name),
                [],
            ));
        }
        entity
            .property(name)
            .cloned()
            .ok_or_else(|| TrackingError::unknown_property(owner.as_str(), name, entity.property_names()))
    }
}
