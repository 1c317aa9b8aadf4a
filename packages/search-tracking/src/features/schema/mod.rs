//! Static schema model
//!
//! Entity descriptors are built once (in code or from YAML) and indexed by
//! entity name; there is no runtime reflection.

mod loader;
mod static_schema;

pub use loader::{EntityDefinition, PropertyDefinition, SchemaFileV1};
pub use static_schema::{EntityBuilder, StaticSchema, StaticSchemaBuilder};
