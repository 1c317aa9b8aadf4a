//! Error types for search-tracking
//!
//! Build-phase failures (schema, definitions, compilation) surface as
//! [`TrackingError`]. Read-phase lookups never fail: an untracked entity or
//! property yields an empty impact set instead.

use crate::config::error::{closest_match, ConfigError};
use thiserror::Error;

/// Main error type for search-tracking operations
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Engine configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Entity name not present in the schema model
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    /// Property not declared on the entity
    #[error("Unknown property '{property}' on entity '{entity}'. {suggestion}")]
    UnknownProperty {
        entity: String,
        property: String,
        suggestion: String,
    },

    /// Dotted path continues past a scalar property
    #[error("Property '{entity}.{property}' is not a reference, path '{path}' cannot continue past it")]
    NotAReference {
        entity: String,
        property: String,
        path: String,
    },

    /// Mapping field declared without any property
    #[error("Empty property path in index definition for entity '{0}'")]
    EmptyPath(String),

    /// Mapping field whose path starts at another entity type
    #[error("Field '{field}' of index for '{entity}' starts at foreign root '{path_root}'")]
    ForeignRoot {
        entity: String,
        field: String,
        path_root: String,
    },

    /// Two fields of one index share a name but not a definition
    #[error("Field '{field}' declared twice with different paths in index of '{entity}'")]
    DuplicateField { entity: String, field: String },

    /// Path revisits a (type, property) pair it already crossed
    #[error("Mapping cycle in index of '{root}': path '{path}' revisits '{entity}.{property}'")]
    MappingCycle {
        root: String,
        path: String,
        entity: String,
        property: String,
    },

    /// Path is longer than `max_path_depth`
    #[error("Path '{path}' in index of '{root}' has {depth} hops, max_path_depth is {max}")]
    PathTooDeep {
        root: String,
        path: String,
        depth: usize,
        max: usize,
    },

    /// Second index definition for the same entity under `DuplicatePolicy::Reject`
    #[error("Multiple index definitions detected for entity '{entity}' (index '{index_name}')")]
    DuplicateDefinition { entity: String, index_name: String },

    /// Schema description is inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TrackingError {
    /// Create an invalid schema error
    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        TrackingError::InvalidSchema(msg.into())
    }

    /// Create an unknown property error, suggesting the closest declared name
    pub fn unknown_property<'a>(
        entity: impl Into<String>,
        property: impl Into<String>,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let property = property.into();
        let candidates: Vec<&str> = candidates.into_iter().collect();
        let suggestion = closest_match(&property, &candidates);

        TrackingError::UnknownProperty {
            entity: entity.into(),
            property,
            suggestion,
        }
    }

    /// True for errors raised while validating the mapping structure itself
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            TrackingError::MappingCycle { .. }
                | TrackingError::PathTooDeep { .. }
                | TrackingError::DuplicateDefinition { .. }
                | TrackingError::DuplicateField { .. }
                | TrackingError::EmptyPath(_)
                | TrackingError::ForeignRoot { .. }
        )
    }
}

/// Result type alias for search-tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;
