//! Index settings
//!
//! Common settings apply to every index; per-entity settings override them
//! key by key.

use crate::config::IndexSettingsConfig;
use crate::shared::models::EntityName;
use serde_json::Value;
use std::collections::BTreeMap;

/// Setting key → JSON value
pub type IndexSettings = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSettingsContext {
    common: IndexSettings,
    per_entity: BTreeMap<EntityName, IndexSettings>,
}

impl IndexSettingsContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &IndexSettingsConfig) -> Self {
        Self {
            common: config.common.clone(),
            per_entity: config
                .entities
                .iter()
                .map(|(entity, settings)| (EntityName::from(entity.as_str()), settings.clone()))
                .collect(),
        }
    }

    /// Builder: add a common setting
    pub fn common_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.common.insert(key.into(), value);
        self
    }

    /// Builder: add a setting for one entity
    pub fn entity_setting(mut self, entity: &str, key: impl Into<String>, value: Value) -> Self {
        self.per_entity
            .entry(EntityName::from(entity))
            .or_default()
            .insert(key.into(), value);
        self
    }

    pub fn common_settings(&self) -> &IndexSettings {
        &self.common
    }

    pub fn explicit_settings_for(&self, entity: &str) -> Option<&IndexSettings> {
        self.per_entity.get(entity)
    }

    /// Common settings overlaid by the entity's explicit settings
    pub fn effective_settings_for(&self, entity: &str) -> IndexSettings {
        let mut effective = self.common.clone();
        if let Some(explicit) = self.per_entity.get(entity) {
            effective.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_explicit_overrides_common() {
        let context = IndexSettingsContext::new()
            .common_setting("number_of_shards", json!(1))
            .common_setting("refresh_interval", json!("1s"))
            .entity_setting("Order", "number_of_shards", json!(3));

        let effective = context.effective_settings_for("Order");
        assert_eq!(effective["number_of_shards"], json!(3));
        assert_eq!(effective["refresh_interval"], json!("1s"));

        let other = context.effective_settings_for("Customer");
        assert_eq!(other, *context.common_settings());
        assert!(context.explicit_settings_for("Customer").is_none());
    }

    #[test]
    fn test_from_config() {
        let mut config = IndexSettingsConfig::default();
        config.common.insert("analysis".to_string(), json!({"analyzer": "standard"}));
        config
            .entities
            .entry("Order".to_string())
            .or_default()
            .insert("analysis".to_string(), json!({"analyzer": "english"}));

        let context = IndexSettingsContext::from_config(&config);
        assert_eq!(
            context.effective_settings_for("Order")["analysis"],
            json!({"analyzer": "english"})
        );
        assert_eq!(
            context.effective_settings_for("Invoice")["analysis"],
            json!({"analyzer": "standard"})
        );
    }
}
