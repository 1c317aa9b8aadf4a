//! Entity metamodel: names, properties and property ranges

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Entity type name (e.g. `sales_Customer`)
///
/// Borrows as `str`, so maps keyed by `EntityName` can be queried with a
/// plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for EntityName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Scalar value kinds a property can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Text,
    Integer,
    Long,
    Decimal,
    Double,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Enum,
    File,
}

/// Single- or collection-valued reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// Value type of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyRange {
    Scalar(ScalarKind),
    Reference {
        target: EntityName,
        cardinality: Cardinality,
    },
}

impl PropertyRange {
    pub fn is_reference(&self) -> bool {
        matches!(self, PropertyRange::Reference { .. })
    }

    /// Referenced entity type, `None` for scalars
    pub fn reference_target(&self) -> Option<&EntityName> {
        match self {
            PropertyRange::Reference { target, .. } => Some(target),
            PropertyRange::Scalar(_) => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            PropertyRange::Reference {
                cardinality: Cardinality::Many,
                ..
            }
        )
    }
}

/// One property of one entity type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetaProperty {
    /// Entity type declaring the property
    pub domain: EntityName,
    pub name: String,
    pub range: PropertyRange,
}

impl MetaProperty {
    pub fn scalar(domain: impl Into<EntityName>, name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            range: PropertyRange::Scalar(kind),
        }
    }

    pub fn reference(
        domain: impl Into<EntityName>,
        name: impl Into<String>,
        target: impl Into<EntityName>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            range: PropertyRange::Reference {
                target: target.into(),
                cardinality,
            },
        }
    }

    pub fn is_reference(&self) -> bool {
        self.range.is_reference()
    }
}

impl fmt::Display for MetaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.name)
    }
}

/// Entity type descriptor: properties plus the properties composing its
/// human-readable instance name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: EntityName,
    pub properties: Vec<MetaProperty>,
    /// Identity-contributing property names, in declaration order
    pub instance_name: Vec<String>,
}

impl EntityType {
    pub fn property(&self, name: &str) -> Option<&MetaProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Identity-contributing properties (unknown names are skipped)
    pub fn identity_properties(&self) -> impl Iterator<Item = &MetaProperty> {
        self.instance_name
            .iter()
            .filter_map(move |name| self.property(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_name_borrows_as_str() {
        let mut set = std::collections::HashSet::new();
        set.insert(EntityName::new("sales_Order"));
        assert!(set.contains("sales_Order"));
        assert_eq!(EntityName::from("sales_Order").to_string(), "sales_Order");
    }

    #[test]
    fn test_range_helpers() {
        let many = MetaProperty::reference("Order", "lines", "OrderLine", Cardinality::Many);
        assert!(many.is_reference());
        assert!(many.range.is_collection());
        assert_eq!(many.range.reference_target().map(EntityName::as_str), Some("OrderLine"));

        let scalar = MetaProperty::scalar("Order", "number", ScalarKind::String);
        assert!(!scalar.is_reference());
        assert!(scalar.range.reference_target().is_none());
        assert_eq!(scalar.to_string(), "Order.number");
    }

    #[test]
    fn test_identity_properties_skip_unknown_names() {
        let entity = EntityType {
            name: "Customer".into(),
            properties: vec![
                MetaProperty::scalar("Customer", "firstName", ScalarKind::String),
                MetaProperty::scalar("Customer", "lastName", ScalarKind::String),
            ],
            instance_name: vec!["lastName".into(), "missing".into()],
        };

        let names: Vec<&str> = entity.identity_properties().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["lastName"]);
    }
}
