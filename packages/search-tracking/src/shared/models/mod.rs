//! Metamodel types shared by schema, mapping and tracking features

mod entity;
mod property_path;

pub use entity::{Cardinality, EntityName, EntityType, MetaProperty, PropertyRange, ScalarKind};
pub use property_path::PropertyPath;
