//! Engine configuration
//!
//! Defaults cover the common case; a versioned YAML file overrides
//! individual fields.
//!
//! # Examples
//!
//! ```rust,ignore
//! use search_tracking::config::{DuplicatePolicy, TrackingConfig};
//!
//! // Defaults
//! let config = TrackingConfig::default();
//!
//! // Builder overrides
//! let config = TrackingConfig::default()
//!     .max_path_depth(8)
//!     .duplicate_definitions(DuplicatePolicy::Reject);
//!
//! // YAML
//! let config = TrackingConfig::from_yaml("search-tracking.yaml")?;
//! ```

pub mod error;
pub mod io;

pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Default prefix for generated index names
pub const DEFAULT_INDEX_NAME_PREFIX: &str = "search_index_";

/// Default upper bound on hops per mapping path
pub const DEFAULT_MAX_PATH_DEPTH: usize = 16;

/// Hard ceiling for `max_path_depth`
pub const MAX_PATH_DEPTH_LIMIT: usize = 64;

/// What to do when two index definitions target the same entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first definition, log a warning, drop the rest
    #[default]
    Warn,
    /// Abort the build with `TrackingError::DuplicateDefinition`
    Reject,
}

/// Index settings as loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSettingsConfig {
    /// Settings applied to every index
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub common: BTreeMap<String, Value>,

    /// Per-entity settings, overriding `common`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entities: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Dependency-tracking engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub index_name_prefix: String,
    pub max_path_depth: usize,
    pub duplicate_definitions: DuplicatePolicy,
    pub settings: IndexSettingsConfig,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            index_name_prefix: DEFAULT_INDEX_NAME_PREFIX.to_string(),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            duplicate_definitions: DuplicatePolicy::default(),
            settings: IndexSettingsConfig::default(),
        }
    }
}

impl TrackingConfig {
    /// Builder: Set index_name_prefix
    pub fn index_name_prefix(mut self, v: impl Into<String>) -> Self {
        self.index_name_prefix = v.into();
        self
    }

    /// Builder: Set max_path_depth
    pub fn max_path_depth(mut self, v: usize) -> Self {
        self.max_path_depth = v;
        self
    }

    /// Builder: Set duplicate_definitions
    pub fn duplicate_definitions(mut self, v: DuplicatePolicy) -> Self {
        self.duplicate_definitions = v;
        self
    }

    /// Builder: Set index settings
    pub fn settings(mut self, v: IndexSettingsConfig) -> Self {
        self.settings = v;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_path_depth == 0 || self.max_path_depth > MAX_PATH_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_path_depth",
                self.max_path_depth,
                1,
                MAX_PATH_DEPTH_LIMIT,
                "Mapping paths need at least one hop",
            ));
        }

        if self.index_name_prefix.chars().any(|c| c.is_uppercase() || c.is_whitespace()) {
            return Err(ConfigError::invalid_value(
                "index_name_prefix",
                "index names must be lowercase without whitespace",
            ));
        }

        Ok(())
    }

    /// Index name used when a definition does not declare one
    pub fn default_index_name(&self, entity_name: &str) -> String {
        format!("{}{}", self.index_name_prefix, entity_name.to_lowercase())
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML text (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;
        ConfigError::check_version(file.version)?;

        let mut config = Self::default();
        if let Some(prefix) = file.index_name_prefix {
            config.index_name_prefix = prefix;
        }
        if let Some(depth) = file.max_path_depth {
            config.max_path_depth = depth;
        }
        if let Some(policy) = file.duplicate_definitions {
            config.duplicate_definitions = policy;
        }
        if let Some(settings) = file.settings {
            config.settings = settings;
        }

        config.validate()?;
        Ok(config)
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            index_name_prefix: Some(self.index_name_prefix.clone()),
            max_path_depth: Some(self.max_path_depth),
            duplicate_definitions: Some(self.duplicate_definitions),
            settings: Some(self.settings.clone()),
        };

        Ok(serde_yaml::to_string(&file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = TrackingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duplicate_definitions, DuplicatePolicy::Warn);
        assert_eq!(config.max_path_depth, DEFAULT_MAX_PATH_DEPTH);
    }

    #[test]
    fn test_default_index_name() {
        let config = TrackingConfig::default();
        assert_eq!(
            config.default_index_name("test_UuidPkEntity"),
            "search_index_test_uuidpkentity"
        );
    }

    #[test]
    fn test_validate_rejects_uppercase_prefix() {
        let config = TrackingConfig::default().index_name_prefix("Search_");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_depth_above_limit() {
        let config = TrackingConfig::default().max_path_depth(MAX_PATH_DEPTH_LIMIT + 1);
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
    }
}
