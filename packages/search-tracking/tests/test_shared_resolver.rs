//! Concurrent readers of a published resolver snapshot

mod common;

use common::{compile, fixture_root_definition, fixture_schema, REFERENCE, ROOT, SUB_REFERENCE};
use search_tracking::{DependencyResolver, IndexDefinition, SharedResolver};
use std::sync::Arc;
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_resolver_is_send_sync() {
    assert_send_sync::<DependencyResolver>();
    assert_send_sync::<SharedResolver>();
}

#[test]
fn test_concurrent_readers_see_same_snapshot() {
    let schema = fixture_schema();
    let shared = Arc::new(SharedResolver::new(compile(&schema, &[fixture_root_definition()])));
    let expected = shared.snapshot().dependencies_for_update(SUB_REFERENCE, ["textValue"]);
    assert_eq!(expected[ROOT].len(), 4);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let expected = expected.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = shared.snapshot();
                    assert_eq!(
                        snapshot.dependencies_for_update(SUB_REFERENCE, ["textValue"]),
                        expected
                    );
                    assert!(snapshot.dependencies_for_update(REFERENCE, ["name"]).is_empty());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_republish_while_reading() {
    let schema = fixture_schema();
    let shared = Arc::new(SharedResolver::new(compile(&schema, &[fixture_root_definition()])));
    let held = shared.snapshot();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..100 {
                    // Either snapshot answers consistently for the root's own field
                    let impact = shared.snapshot().dependencies_for_update(ROOT, ["textValue"]);
                    assert_eq!(impact.len(), 1);
                }
            })
        })
        .collect();

    let rebuilt = compile(
        &schema,
        &[IndexDefinition::new(ROOT).include(["textValue", "oneToOneAssociation"])],
    );
    shared.publish(rebuilt);

    for reader in readers {
        reader.join().unwrap();
    }

    // Held snapshot keeps its own view
    assert!(held.dependencies_for_update(REFERENCE, ["name"]).is_empty());
    assert!(!shared
        .snapshot()
        .dependencies_for_update(REFERENCE, ["name"])
        .is_empty());
}
