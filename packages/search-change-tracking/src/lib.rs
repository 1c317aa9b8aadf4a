/*
 * Search Change Tracking - Entity change events → indexing queue items
 *
 * Modules:
 * - tracker/ : EntityChange events, EntityChangeTracker (uses a published
 *              search-tracking resolver snapshot per batch)
 * - queue/   : IndexingQueue sink trait, in-memory FIFO implementation
 * - error/   : ChangeTrackingError (kind + message + source)
 */

pub mod error;
pub mod queue;
pub mod tracker;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use error::{ChangeTrackingError, ErrorKind, Result};
pub use queue::{
    InMemoryIndexingQueue, IndexingOperation, IndexingQueue, IndexingQueueItem, IndexingTarget,
};
pub use tracker::{EntityChange, EntityChangeTracker};
