//! Feature modules
//!
//! - `schema`   : static entity descriptor table (SchemaModel implementation)
//! - `mapping`  : index definitions → IndexConfiguration
//! - `tracking` : path expansion, dependency compilation, registry, catalog, queries
//! - `settings` : per-index settings merge

pub mod mapping;
pub mod schema;
pub mod settings;
pub mod tracking;
