//! End-to-end tests: schema, index definitions and config loaded from YAML

mod common;

use common::{dotted, expect};
use pretty_assertions::assert_eq;
use search_tracking::{
    load_index_definitions, DependencyCompiler, DuplicatePolicy, IndexSettingsContext,
    StaticSchema, TrackingConfig, TrackingError,
};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load() -> (StaticSchema, TrackingConfig) {
    let schema = StaticSchema::from_yaml(fixture("schema.yaml")).unwrap();
    let config = TrackingConfig::from_yaml(fixture("config.yaml")).unwrap();
    (schema, config)
}

#[test]
fn test_config_file() {
    let (_, config) = load();
    assert_eq!(config.index_name_prefix, "shop_");
    assert_eq!(config.max_path_depth, 8);
    assert_eq!(config.duplicate_definitions, DuplicatePolicy::Reject);

    let settings = IndexSettingsContext::from_config(&config.settings);
    assert_eq!(
        settings.effective_settings_for("sales_Order")["number_of_shards"],
        json!(3)
    );
    assert_eq!(
        settings.effective_settings_for("sales_Customer")["number_of_shards"],
        json!(1)
    );
}

#[test]
fn test_compile_from_files() {
    let (schema, config) = load();
    let definitions = load_index_definitions(fixture("indexes.yaml")).unwrap();
    let resolver = DependencyCompiler::new(&schema, &config)
        .compile_definitions(&definitions)
        .unwrap();
    let catalog = resolver.catalog();

    let order = catalog.by_entity_name("sales_Order").unwrap();
    assert_eq!(order.index_name(), "shop_sales_order");
    assert!(order.field("lines.internalNote").is_none());
    assert!(order.field("lines.quantity").is_some());
    assert!(order.field("_instance_name").unwrap().standalone);
    assert_eq!(
        catalog.by_index_name("customers").unwrap().entity_name().as_str(),
        "sales_Customer"
    );
    assert!(catalog.is_affected("sales_Address"));
    assert!(catalog.is_affected("sales_Product"));
    assert!(!catalog.is_directly_indexed("sales_Product"));

    // customer is rendered through its instance name
    assert_eq!(
        dotted(&resolver.dependencies_for_update("sales_Customer", ["lastName"])),
        vec![
            ("sales_Customer".to_string(), vec![String::new()]),
            ("sales_Order".to_string(), vec!["customer".to_string()]),
        ]
    );
    assert_eq!(
        dotted(&resolver.dependencies_for_update("sales_Address", ["city"])),
        expect("sales_Order", &["customer.address"])
    );
    assert_eq!(
        dotted(&resolver.dependencies_for_update("sales_Product", ["name"])),
        expect("sales_Order", &["lines.product"])
    );
    assert_eq!(
        dotted(&resolver.dependencies_for_delete("sales_OrderLine")),
        expect("sales_Order", &["lines"])
    );
    assert!(resolver
        .dependencies_for_update("sales_OrderLine", ["internalNote"])
        .is_empty());
    assert!(resolver
        .dependencies_for_update("sales_Product", ["price"])
        .is_empty());
}

#[test]
fn test_duplicate_definition_file_rejected() {
    let (schema, config) = load();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
version: 1
indexes:
  - entity: sales_Order
    include: [number]
  - entity: sales_Order
    include: [date]
"#
    )
    .unwrap();

    let definitions = load_index_definitions(file.path()).unwrap();
    let err = DependencyCompiler::new(&schema, &config)
        .compile_definitions(&definitions)
        .unwrap_err();
    assert!(matches!(err, TrackingError::DuplicateDefinition { .. }));
}

#[test]
fn test_missing_version_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "indexes: []").unwrap();

    let err = load_index_definitions(file.path()).unwrap_err();
    assert!(matches!(err, TrackingError::Config(_)));
}

#[test]
fn test_unknown_property_in_file() {
    let (schema, config) = load();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
version: 1
indexes:
  - entity: sales_Order
    include: [customer.emial]
"#
    )
    .unwrap();

    let definitions = load_index_definitions(file.path()).unwrap();
    let err = DependencyCompiler::new(&schema, &config)
        .compile_definitions(&definitions)
        .unwrap_err();
    assert!(err.to_string().contains("Did you mean 'email'?"), "{err}");
}
