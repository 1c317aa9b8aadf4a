//! Indexing queue
//!
//! The tracker hands deduplicated [`IndexingQueueItem`]s to an
//! [`IndexingQueue`] sink. [`InMemoryIndexingQueue`] keeps them in FIFO order
//! until a consumer drains them.

use crate::error::Result;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use search_tracking::{EntityName, PropertyPath};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexingOperation {
    Index,
    Delete,
}

impl IndexingOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingOperation::Index => "INDEX",
            IndexingOperation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for IndexingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Documents an item refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndexingTarget {
    /// A single instance of a directly indexed entity
    Instance { id: String },
    /// Every root instance reaching `changed_id` through `back_path`
    Dependents {
        back_path: PropertyPath,
        changed_entity: EntityName,
        changed_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexingQueueItem {
    pub id: Uuid,
    /// Root entity type whose index is affected
    pub entity: EntityName,
    pub target: IndexingTarget,
    pub operation: IndexingOperation,
    pub created_at: DateTime<Utc>,
}

impl IndexingQueueItem {
    pub fn new(entity: EntityName, target: IndexingTarget, operation: IndexingOperation) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            target,
            operation,
            created_at: Utc::now(),
        }
    }

    pub fn instance(entity: EntityName, id: impl Into<String>, operation: IndexingOperation) -> Self {
        Self::new(entity, IndexingTarget::Instance { id: id.into() }, operation)
    }

    pub fn dependents(
        root: EntityName,
        back_path: PropertyPath,
        changed_entity: EntityName,
        changed_id: impl Into<String>,
    ) -> Self {
        Self::new(
            root,
            IndexingTarget::Dependents {
                back_path,
                changed_entity,
                changed_id: changed_id.into(),
            },
            IndexingOperation::Index,
        )
    }

    /// Identity of the request, ignoring item id and timestamp
    pub fn dedup_key(&self) -> (&EntityName, &IndexingTarget, IndexingOperation) {
        (&self.entity, &self.target, self.operation)
    }
}

/// Sink for indexing requests
pub trait IndexingQueue: Send + Sync {
    /// Store `items`, returning how many were accepted
    fn enqueue(&self, items: Vec<IndexingQueueItem>) -> Result<usize>;
}

/// FIFO queue held in memory
///
/// Counters record every item enqueued since creation or the last
/// [`clear`](Self::clear), drained or not.
#[derive(Debug, Default)]
pub struct InMemoryIndexingQueue {
    items: Mutex<VecDeque<IndexingQueueItem>>,
    counters: DashMap<(EntityName, IndexingOperation), usize>,
}

impl InMemoryIndexingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove up to `max` items from the front of the queue
    pub fn drain(&self, max: usize) -> Vec<IndexingQueueItem> {
        let mut items = self.items.lock();
        let count = max.min(items.len());
        items.drain(..count).collect()
    }

    pub fn drain_all(&self) -> Vec<IndexingQueueItem> {
        self.items.lock().drain(..).collect()
    }

    /// Copy of the queued items in FIFO order
    pub fn items(&self) -> Vec<IndexingQueueItem> {
        self.items.lock().iter().cloned().collect()
    }

    pub fn enqueued_count(&self, entity: &str, operation: IndexingOperation) -> usize {
        self.counters
            .get(&(EntityName::from(entity), operation))
            .map(|count| *count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn clear(&self) {
        self.items.lock().clear();
        self.counters.clear();
    }
}

impl IndexingQueue for InMemoryIndexingQueue {
    fn enqueue(&self, items: Vec<IndexingQueueItem>) -> Result<usize> {
        let accepted = items.len();
        for item in &items {
            *self
                .counters
                .entry((item.entity.clone(), item.operation))
                .or_insert(0) += 1;
        }
        self.items.lock().extend(items);
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(entity: &str, id: &str, operation: IndexingOperation) -> IndexingQueueItem {
        IndexingQueueItem::instance(EntityName::from(entity), id, operation)
    }

    #[test]
    fn test_fifo_drain() {
        let queue = InMemoryIndexingQueue::new();
        let accepted = queue
            .enqueue(vec![
                item("Order", "1", IndexingOperation::Index),
                item("Order", "2", IndexingOperation::Index),
                item("Order", "3", IndexingOperation::Delete),
            ])
            .unwrap();
        assert_eq!(accepted, 3);

        let first = queue.drain(2);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].target, IndexingTarget::Instance { id: "1".into() });
        assert_eq!(first[1].target, IndexingTarget::Instance { id: "2".into() });
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.drain(10).len(), 1);
        assert!(queue.is_empty());
        assert!(queue.drain(10).is_empty());
    }

    #[test]
    fn test_counters_survive_drain() {
        let queue = InMemoryIndexingQueue::new();
        queue
            .enqueue(vec![
                item("Order", "1", IndexingOperation::Index),
                item("Order", "1", IndexingOperation::Delete),
                item("Customer", "7", IndexingOperation::Index),
            ])
            .unwrap();
        queue.drain_all();

        assert_eq!(queue.enqueued_count("Order", IndexingOperation::Index), 1);
        assert_eq!(queue.enqueued_count("Order", IndexingOperation::Delete), 1);
        assert_eq!(queue.enqueued_count("Customer", IndexingOperation::Delete), 0);

        queue.clear();
        assert_eq!(queue.enqueued_count("Order", IndexingOperation::Index), 0);
    }

    #[test]
    fn test_dedup_key_ignores_id_and_timestamp() {
        let a = item("Order", "1", IndexingOperation::Index);
        let b = item("Order", "1", IndexingOperation::Index);
        assert_ne!(a.id, b.id);
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_ne!(
            a.dedup_key(),
            item("Order", "1", IndexingOperation::Delete).dedup_key()
        );
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(IndexingOperation::Index.to_string(), "INDEX");
        assert_eq!(IndexingOperation::Delete.to_string(), "DELETE");
    }
}
