//! Schema YAML (v1)
//!
//! ```yaml
//! version: 1
//! entities:
//!   - name: sales_Order
//!     instance_name: [number]
//!     properties:
//!       - { name: number, type: string }
//!       - { name: customer, reference: sales_Customer }
//!       - { name: lines, reference: sales_OrderLine, many: true }
//! ```

use super::static_schema::StaticSchema;
use crate::config::ConfigError;
use crate::errors::{Result, TrackingError};
use crate::shared::models::{Cardinality, EntityName, EntityType, MetaProperty, ScalarKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFileV1 {
    pub version: Option<u32>,
    #[serde(default)]
    pub entities: Vec<EntityDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDefinition {
    pub name: String,
    #[serde(default)]
    pub instance_name: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

/// Either `type` (scalar) or `reference` (entity name) must be present
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ScalarKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub many: bool,
}

impl PropertyDefinition {
    fn to_meta_property(&self, domain: &EntityName) -> Result<MetaProperty> {
        match (&self.kind, &self.reference) {
            (Some(kind), None) if !self.many => {
                Ok(MetaProperty::scalar(domain.clone(), self.name.as_str(), *kind))
            }
            (None, Some(target)) => {
                let cardinality = if self.many {
                    Cardinality::Many
                } else {
                    Cardinality::One
                };
                Ok(MetaProperty::reference(
                    domain.clone(),
                    self.name.as_str(),
                    target.as_str(),
                    cardinality,
                ))
            }
            (Some(_), None) => Err(TrackingError::invalid_schema(format!(
                "scalar property '{}.{}' cannot be 'many'",
                domain, self.name
            ))),
            _ => Err(TrackingError::invalid_schema(format!(
                "property '{}.{}' needs exactly one of 'type' or 'reference'",
                domain, self.name
            ))),
        }
    }
}

impl EntityDefinition {
    fn to_entity_type(&self) -> Result<EntityType> {
        let name = EntityName::new(self.name.as_str());
        let properties = self
            .properties
            .iter()
            .map(|p| p.to_meta_property(&name))
            .collect::<Result<Vec<_>>>()?;

        Ok(EntityType {
            name,
            properties,
            instance_name: self.instance_name.clone(),
        })
    }
}

impl StaticSchema {
    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        debug!("Loading schema from {}", path.as_ref().display());
        Self::from_yaml_str(&content)
    }

    /// Parse YAML text (v1 schema)
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: SchemaFileV1 = serde_yaml::from_str(content)?;
        ConfigError::check_version(file.version)?;

        let mut builder = StaticSchema::builder();
        for definition in &file.entities {
            builder = builder.push(definition.to_entity_type()?);
        }
        builder.build()
    }
}
