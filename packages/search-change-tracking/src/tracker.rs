//! Entity change tracking
//!
//! Rules per change:
//! - created: directly indexed → INDEX the instance
//! - updated: directly indexed → INDEX the instance, then INDEX every root
//!   reaching the instance through a changed property
//! - deleted: directly indexed → DELETE the instance, then INDEX every root
//!   whose reference to the instance is severed

use crate::error::{ChangeTrackingError, Result};
use crate::queue::{IndexingOperation, IndexingQueue, IndexingQueueItem};
use search_tracking::{
    DependencyCompiler, DependencyResolver, EntityName, ImpactSet, IndexDefinition, SchemaModel,
    SharedResolver, TrackingConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Persistence event reported by the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityChange {
    Created {
        entity: EntityName,
        id: String,
    },
    Updated {
        entity: EntityName,
        id: String,
        changed_properties: Vec<String>,
    },
    Deleted {
        entity: EntityName,
        id: String,
    },
}

impl EntityChange {
    pub fn created(entity: &str, id: impl Into<String>) -> Self {
        Self::Created {
            entity: EntityName::from(entity),
            id: id.into(),
        }
    }

    pub fn updated<'a>(
        entity: &str,
        id: impl Into<String>,
        changed_properties: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::Updated {
            entity: EntityName::from(entity),
            id: id.into(),
            changed_properties: changed_properties.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn deleted(entity: &str, id: impl Into<String>) -> Self {
        Self::Deleted {
            entity: EntityName::from(entity),
            id: id.into(),
        }
    }

    pub fn entity(&self) -> &EntityName {
        match self {
            Self::Created { entity, .. } | Self::Updated { entity, .. } | Self::Deleted { entity, .. } => {
                entity
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Created { id, .. } | Self::Updated { id, .. } | Self::Deleted { id, .. } => id,
        }
    }
}

/// Turns entity changes into indexing queue items
pub struct EntityChangeTracker {
    resolver: Arc<SharedResolver>,
    queue: Arc<dyn IndexingQueue>,
}

impl EntityChangeTracker {
    pub fn new(resolver: Arc<SharedResolver>, queue: Arc<dyn IndexingQueue>) -> Self {
        Self { resolver, queue }
    }

    /// Compile `definitions` against `schema` and track with the result
    pub fn from_definitions(
        schema: &dyn SchemaModel,
        config: &TrackingConfig,
        definitions: &[IndexDefinition],
        queue: Arc<dyn IndexingQueue>,
    ) -> Result<Self> {
        let resolver = DependencyCompiler::new(schema, config).compile_definitions(definitions)?;
        Ok(Self::new(Arc::new(SharedResolver::new(resolver)), queue))
    }

    /// Recompile `definitions` and publish the result for later batches
    ///
    /// On error the current snapshot stays in place.
    pub fn rebuild(
        &self,
        schema: &dyn SchemaModel,
        config: &TrackingConfig,
        definitions: &[IndexDefinition],
    ) -> Result<()> {
        let resolver = DependencyCompiler::new(schema, config).compile_definitions(definitions)?;
        self.resolver.publish(resolver);
        info!("Published dependency snapshot for {} indexes", definitions.len());
        Ok(())
    }

    pub fn resolver(&self) -> &Arc<SharedResolver> {
        &self.resolver
    }

    /// Plan and enqueue one batch, returning the number of accepted items
    pub fn track(&self, changes: impl IntoIterator<Item = EntityChange>) -> Result<usize> {
        let items = self.plan(changes)?;
        if items.is_empty() {
            return Ok(0);
        }

        let planned = items.len();
        let accepted = self.queue.enqueue(items)?;
        info!("Enqueued {} of {} indexing items", accepted, planned);
        Ok(accepted)
    }

    /// Deduplicated queue items for a batch, in first-seen order
    ///
    /// The whole batch is planned against one resolver snapshot.
    pub fn plan(&self, changes: impl IntoIterator<Item = EntityChange>) -> Result<Vec<IndexingQueueItem>> {
        let snapshot = self.resolver.snapshot();
        let mut planned = Vec::new();
        for change in changes {
            if change.id().is_empty() {
                return Err(ChangeTrackingError::invalid_event(format!(
                    "Change of '{}' without instance id",
                    change.entity()
                )));
            }
            Self::plan_change(&snapshot, &change, &mut planned);
        }
        Ok(dedup(planned))
    }

    fn plan_change(resolver: &DependencyResolver, change: &EntityChange, out: &mut Vec<IndexingQueueItem>) {
        let entity = change.entity();
        if !resolver.catalog().is_affected(entity.as_str()) {
            debug!("Ignoring change of not affected entity {}", entity);
            return;
        }
        let directly_indexed = resolver.catalog().is_directly_indexed(entity.as_str());

        match change {
            EntityChange::Created { id, .. } => {
                if directly_indexed {
                    out.push(IndexingQueueItem::instance(entity.clone(), id, IndexingOperation::Index));
                }
            }
            EntityChange::Updated {
                id,
                changed_properties,
                ..
            } => {
                if directly_indexed {
                    out.push(IndexingQueueItem::instance(entity.clone(), id, IndexingOperation::Index));
                }
                let impact = resolver.dependencies_for_update(entity.as_str(), changed_properties);
                push_dependents(&impact, entity, id, out);
            }
            EntityChange::Deleted { id, .. } => {
                if directly_indexed {
                    out.push(IndexingQueueItem::instance(entity.clone(), id, IndexingOperation::Delete));
                }
                let impact = resolver.dependencies_for_delete(entity.as_str());
                push_dependents(&impact, entity, id, out);
            }
        }
    }
}

/// Dependent items for every non-empty back path of `impact`
fn push_dependents(impact: &ImpactSet, entity: &EntityName, id: &str, out: &mut Vec<IndexingQueueItem>) {
    for (root, back_paths) in impact {
        for back_path in back_paths.iter().filter(|path| !path.is_empty()) {
            debug!("{} {} affects {} via {}", entity, id, root, back_path.dotted());
            out.push(IndexingQueueItem::dependents(
                root.clone(),
                back_path.clone(),
                entity.clone(),
                id,
            ));
        }
    }
}

fn dedup(items: Vec<IndexingQueueItem>) -> Vec<IndexingQueueItem> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        items.iter().map(|item| seen.insert(item.dedup_key())).collect()
    };
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect()
}
