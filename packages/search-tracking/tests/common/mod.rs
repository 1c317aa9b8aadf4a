//! Common test utilities for search-tracking
//!
//! Shared schema and index definition fixtures for integration tests.

#![allow(dead_code)]

use search_tracking::{
    DependencyCompiler, DependencyResolver, EntityName, ImpactSet, IndexDefinition, PropertyPath, ScalarKind,
    StaticSchema, TrackingConfig,
};

pub const ROOT: &str = "test_RootEntity";
pub const REFERENCE: &str = "test_ReferenceEntity";
pub const SUB_REFERENCE: &str = "test_SubReferenceEntity";

/// Root → reference → sub-reference, each level with one-to-one and
/// one-to-many associations; `name` is the instance name everywhere
pub fn fixture_schema() -> StaticSchema {
    StaticSchema::builder()
        .entity(ROOT, |e| {
            e.scalar("name", ScalarKind::String)
                .scalar("textValue", ScalarKind::Text)
                .reference("oneToOneAssociation", REFERENCE)
                .collection("oneToManyAssociation", REFERENCE)
                .instance_name(["name"])
        })
        .entity(REFERENCE, |e| {
            e.scalar("name", ScalarKind::String)
                .scalar("textValue", ScalarKind::Text)
                .reference("oneToOneAssociation", SUB_REFERENCE)
                .collection("oneToManyAssociation", SUB_REFERENCE)
                .instance_name(["name"])
        })
        .entity(SUB_REFERENCE, |e| {
            e.scalar("name", ScalarKind::String)
                .scalar("textValue", ScalarKind::Text)
                .instance_name(["name"])
        })
        .build()
        .unwrap()
}

/// Root index tracking `textValue` at every level, but no `name` below the root
pub fn fixture_root_definition() -> IndexDefinition {
    IndexDefinition::new(ROOT).include([
        "name",
        "textValue",
        "oneToOneAssociation.textValue",
        "oneToManyAssociation.textValue",
        "oneToOneAssociation.oneToOneAssociation.textValue",
        "oneToOneAssociation.oneToManyAssociation.textValue",
        "oneToManyAssociation.oneToOneAssociation.textValue",
        "oneToManyAssociation.oneToManyAssociation.textValue",
    ])
}

pub fn compile(schema: &StaticSchema, definitions: &[IndexDefinition]) -> DependencyResolver {
    let config = TrackingConfig::default();
    DependencyCompiler::new(schema, &config)
        .compile_definitions(definitions)
        .unwrap()
}

/// Impact set flattened to `root -> [dotted back paths]`, paths sorted
pub fn dotted(impact: &ImpactSet) -> Vec<(String, Vec<String>)> {
    impact
        .iter()
        .map(|(root, paths)| {
            let mut dotted: Vec<String> = paths.iter().map(PropertyPath::dotted).collect();
            dotted.sort();
            (root.to_string(), dotted)
        })
        .collect()
}

/// Single-root expectation helper
pub fn expect(root: &str, paths: &[&str]) -> Vec<(String, Vec<String>)> {
    vec![(
        root.to_string(),
        paths.iter().map(|p| p.to_string()).collect(),
    )]
}

pub fn entity(name: &str) -> EntityName {
    EntityName::from(name)
}
