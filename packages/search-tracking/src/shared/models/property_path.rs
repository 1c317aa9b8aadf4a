//! Property paths from a root entity type through its associations

use super::entity::{EntityName, MetaProperty, PropertyRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered chain of property hops starting at a root entity type
///
/// Every hop is owned by the type reached so far: the first hop by the root,
/// each following hop by the reference target of the previous one. The empty
/// path denotes the root document itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyPath {
    root: EntityName,
    hops: Vec<MetaProperty>,
}

impl PropertyPath {
    /// Empty path: the root document itself
    pub fn root_of(root: impl Into<EntityName>) -> Self {
        Self {
            root: root.into(),
            hops: Vec::new(),
        }
    }

    /// Build a path from explicit hops, `None` if the hops do not chain
    pub fn new(root: impl Into<EntityName>, hops: Vec<MetaProperty>) -> Option<Self> {
        let root = root.into();
        let mut owner = &root;
        for hop in &hops {
            if &hop.domain != owner {
                return None;
            }
            match hop.range.reference_target() {
                Some(target) => owner = target,
                // Only the last hop may be a scalar
                None if std::ptr::eq(hop, hops.last()?) => {}
                None => return None,
            }
        }
        Some(Self { root, hops })
    }

    pub fn root(&self) -> &EntityName {
        &self.root
    }

    pub fn hops(&self) -> &[MetaProperty] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn last(&self) -> Option<&MetaProperty> {
        self.hops.last()
    }

    /// Range of the final hop, `None` for the empty path
    pub fn range(&self) -> Option<&PropertyRange> {
        self.hops.last().map(|hop| &hop.range)
    }

    /// Entity type the next hop would be owned by
    ///
    /// `None` when the path ends on a scalar.
    pub fn reached_type(&self) -> Option<&EntityName> {
        match self.hops.last() {
            None => Some(&self.root),
            Some(hop) => hop.range.reference_target(),
        }
    }

    /// Path without its last hop, `None` for the empty path
    pub fn parent(&self) -> Option<PropertyPath> {
        let (_, prefix) = self.hops.split_last()?;
        Some(Self {
            root: self.root.clone(),
            hops: prefix.to_vec(),
        })
    }

    /// Path extended by one hop
    ///
    /// The caller guarantees `hop` is owned by [`Self::reached_type`].
    pub fn child(&self, hop: MetaProperty) -> PropertyPath {
        debug_assert_eq!(Some(&hop.domain), self.reached_type());
        let mut hops = Vec::with_capacity(self.hops.len() + 1);
        hops.extend_from_slice(&self.hops);
        hops.push(hop);
        Self {
            root: self.root.clone(),
            hops,
        }
    }

    /// Dotted property names (`refA.refB.name`), empty for the root itself
    pub fn dotted(&self) -> String {
        self.hops
            .iter()
            .map(|hop| hop.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True if `prefix` equals this path or is one of its ancestors
    pub fn starts_with(&self, prefix: &PropertyPath) -> bool {
        self.root == prefix.root && self.hops.starts_with(&prefix.hops)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hops.is_empty() {
            write!(f, "{}", self.root)
        } else {
            write!(f, "{}.{}", self.root, self.dotted())
        }
    }
}
