//! Index mapping model
//!
//! An [`IndexConfiguration`] describes one directly indexed entity type: its
//! index name, the document fields and the entity types those fields reach.
//! Definitions are loaded from YAML and resolved against the schema by
//! [`IndexDefinitionProcessor`].

mod definition;
mod descriptor;

pub use definition::{
    load_index_definitions, parse_index_definitions, IndexDefinition, IndexDefinitionProcessor,
    IndexDefinitionsFileV1, StandaloneField,
};
pub use descriptor::{IndexConfiguration, MappingFieldDescriptor};
