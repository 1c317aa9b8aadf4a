//! Dependency compilation
//!
//! Turns index configurations into a catalog and a reverse-dependency
//! registry. Everything is accumulated locally and only handed out as a
//! finished [`DependencyResolver`], so a failed build leaves nothing behind.
//!
//! For each tracked field:
//! 1. Expand the field path (reference fields gain identity properties)
//! 2. Reject paths that revisit a (type, property) pair or exceed `max_path_depth`
//! 3. Register one tracking entry per suffix level of every effective path

use super::catalog::IndexCatalog;
use super::expander::PathExpander;
use super::registry::{DependencyRegistry, RegistryBuilder};
use super::resolver::DependencyResolver;
use super::tracking_entry::TrackingEntry;
use crate::config::TrackingConfig;
use crate::errors::{Result, TrackingError};
use crate::features::mapping::{IndexConfiguration, IndexDefinition, IndexDefinitionProcessor};
use crate::shared::models::PropertyPath;
use crate::shared::ports::SchemaModel;
use rustc_hash::FxHashSet;
use std::time::Instant;
use tracing::{debug, info};

pub struct DependencyCompiler<'a> {
    schema: &'a dyn SchemaModel,
    config: &'a TrackingConfig,
}

impl<'a> DependencyCompiler<'a> {
    pub fn new(schema: &'a dyn SchemaModel, config: &'a TrackingConfig) -> Self {
        Self { schema, config }
    }

    /// Resolve declarative definitions against the schema, then compile them
    pub fn compile_definitions(&self, definitions: &[IndexDefinition]) -> Result<DependencyResolver> {
        let processor = IndexDefinitionProcessor::new(self.schema, self.config);
        let configurations = definitions
            .iter()
            .map(|definition| processor.create_index_configuration(definition))
            .collect::<Result<Vec<_>>>()?;
        self.compile(configurations)
    }

    pub fn compile(
        &self,
        configurations: impl IntoIterator<Item = IndexConfiguration>,
    ) -> Result<DependencyResolver> {
        self.config.validate()?;
        let start = Instant::now();

        let mut catalog = IndexCatalog::new(self.config.duplicate_definitions);
        let mut registry = DependencyRegistry::builder();
        let mut effective_paths = 0usize;

        for configuration in configurations {
            // Structural errors are fatal even for a duplicate that gets dropped
            let compiled = self.compile_configuration(&configuration)?;
            if !catalog.register(configuration)? {
                continue;
            }
            // Identity expansion can reach types no declared field names
            catalog.extend_affected(
                compiled
                    .iter()
                    .flat_map(PropertyPath::hops)
                    .filter_map(|hop| hop.range.reference_target().cloned()),
            );
            effective_paths += compiled.len();
            for path in compiled {
                Self::register_path(&mut registry, &path);
            }
        }

        let registry = registry.build();
        info!(
            "Compiled {} index configurations: {} effective paths, {} dependency facts in {:?}",
            catalog.len(),
            effective_paths,
            registry.len(),
            start.elapsed()
        );

        Ok(DependencyResolver::new(catalog, registry))
    }

    /// Effective paths of every tracked field of one configuration
    fn compile_configuration(&self, configuration: &IndexConfiguration) -> Result<Vec<PropertyPath>> {
        let expander = PathExpander::new(self.schema);
        let mut paths = Vec::new();

        for field in configuration.tracked_fields() {
            for path in expander.expand(field) {
                self.check_path(&path)?;
                debug!(
                    "Effective path for field '{}' of '{}': {}",
                    field.field_name,
                    configuration.entity_name(),
                    path
                );
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn check_path(&self, path: &PropertyPath) -> Result<()> {
        if path.len() > self.config.max_path_depth {
            return Err(TrackingError::PathTooDeep {
                root: path.root().to_string(),
                path: path.dotted(),
                depth: path.len(),
                max: self.config.max_path_depth,
            });
        }

        let mut visited = FxHashSet::default();
        for hop in path.hops() {
            if !visited.insert((&hop.domain, hop.name.as_str())) {
                return Err(TrackingError::MappingCycle {
                    root: path.root().to_string(),
                    path: path.dotted(),
                    entity: hop.domain.to_string(),
                    property: hop.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn register_path(registry: &mut RegistryBuilder, path: &PropertyPath) {
        for entry in TrackingEntry::chain(path) {
            debug!("Tracking {} for {}", entry, path);
            registry.insert(entry);
        }
    }
}
