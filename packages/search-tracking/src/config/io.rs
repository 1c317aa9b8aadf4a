//! Configuration I/O (YAML loading)
//!
//! Defines the YAML schema types. Loading and export live on
//! `TrackingConfig` in mod.rs.

use super::{DuplicatePolicy, IndexSettingsConfig};
use serde::{Deserialize, Serialize};

/// YAML Schema v1
///
/// Every field except `version` is optional; absent fields keep their
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_path_depth: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_definitions: Option<DuplicatePolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<IndexSettingsConfig>,
}
