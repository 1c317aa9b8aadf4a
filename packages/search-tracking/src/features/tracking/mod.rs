//! Dependency tracking
//!
//! Build phase: [`DependencyCompiler`] expands every tracked mapping field
//! ([`PathExpander`]), splits each effective path into [`TrackingEntry`]
//! facts and fills the [`IndexCatalog`] and [`DependencyRegistry`].
//!
//! Read phase: [`DependencyResolver`] answers "which root documents must be
//! reindexed" for updates and deletes, published through [`SharedResolver`].

mod catalog;
mod compiler;
mod expander;
mod registry;
mod resolver;
mod tracking_entry;

pub use catalog::IndexCatalog;
pub use compiler::DependencyCompiler;
pub use expander::PathExpander;
pub use registry::{DependencyRegistry, RegistryBuilder};
pub use resolver::{DependencyResolver, ImpactSet, SharedResolver};
pub use tracking_entry::{DeleteTracking, TrackingEntry, UpdateTracking};
