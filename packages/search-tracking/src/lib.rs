/*
 * Search Tracking - Reverse-dependency engine for denormalized search documents
 *
 * Feature-First Architecture:
 * - shared/      : Metamodel (EntityName, MetaProperty, PropertyPath) and ports
 * - features/    : schema → mapping → tracking (expander, compiler, registry, catalog)
 * - config/      : Versioned YAML engine configuration
 *
 * Lifecycle:
 * - Build phase: definitions are compiled once into an immutable snapshot
 * - Read phase: lock-free dependency queries from any thread
 */

/// Shared models and ports
pub mod shared;

/// Feature modules (schema, mapping, tracking, settings)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, DuplicatePolicy, TrackingConfig};
pub use errors::{Result, TrackingError};
pub use features::mapping::{
    load_index_definitions, IndexConfiguration, IndexDefinition, IndexDefinitionProcessor,
    MappingFieldDescriptor,
};
pub use features::schema::{StaticSchema, StaticSchemaBuilder};
pub use features::settings::{IndexSettings, IndexSettingsContext};
pub use features::tracking::{
    DependencyCompiler, DependencyRegistry, DependencyResolver, ImpactSet, IndexCatalog,
    PathExpander, SharedResolver, TrackingEntry,
};
pub use shared::models::{
    Cardinality, EntityName, EntityType, MetaProperty, PropertyPath, PropertyRange, ScalarKind,
};
pub use shared::ports::SchemaModel;
