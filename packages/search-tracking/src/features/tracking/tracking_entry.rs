use crate::shared::models::{EntityName, PropertyPath};
use std::fmt;

/// Update half: a change of `property` on an instance of `entity`
/// invalidates the root documents reached through `back_path`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateTracking {
    pub entity: EntityName,
    pub property: String,
    /// Path from the root to the owner of `property`; empty for root properties
    pub back_path: PropertyPath,
}

/// Delete half: deleting an instance of `entity` severs the reference at the
/// end of `back_path`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeleteTracking {
    pub entity: EntityName,
    /// Complete path through the reference hop, never empty
    pub back_path: PropertyPath,
}

/// Compiled fact for one hop of one effective mapping path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingEntry {
    pub update: UpdateTracking,
    /// Present only when the hop's range is a reference
    pub delete: Option<DeleteTracking>,
}

impl TrackingEntry {
    /// Entry for the last hop of `path`, `None` for the empty path
    pub fn of(path: &PropertyPath) -> Option<Self> {
        let hop = path.last()?;
        let back_path = path.parent()?;

        let delete = hop.range.reference_target().map(|target| DeleteTracking {
            entity: target.clone(),
            back_path: path.clone(),
        });

        Some(Self {
            update: UpdateTracking {
                entity: hop.domain.clone(),
                property: hop.name.clone(),
                back_path,
            },
            delete,
        })
    }

    /// Entries for every suffix level of `path`, longest first
    ///
    /// `a.b.c` yields entries for `a.b.c`, `a.b` and `a`.
    pub fn chain(path: &PropertyPath) -> Vec<Self> {
        let mut entries = Vec::with_capacity(path.len());
        let mut current = Some(path.clone());
        while let Some(level) = current {
            let Some(entry) = Self::of(&level) else {
                break;
            };
            current = Some(entry.update.back_path.clone());
            entries.push(entry);
        }
        entries
    }
}

impl fmt::Display for TrackingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "update {}.{} -> {}",
            self.update.entity, self.update.property, self.update.back_path
        )?;
        if let Some(delete) = &self.delete {
            write!(f, ", delete {} -> {}", delete.entity, delete.back_path)?;
        }
        Ok(())
    }
}
