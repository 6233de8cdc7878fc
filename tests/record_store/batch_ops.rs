//! Batch operation tests
//!
//! Per-item semantics of the batch family. All-or-nothing behavior is
//! covered in `atomicity`.

use crate::*;
use recordstore::Error;

// =============================================================================
// BATCH INSERT / READ
// =============================================================================

#[test]
fn test_batch_insert_then_batch_read_in_order() {
    let store = create_store();
    let values = vec![
        fields(&[("field0", "v1")]),
        fields(&[("field0", "v2")]),
        fields(&[("field0", "v3")]),
    ];
    store
        .batch_insert(&cx(), "t", &["k1", "k2", "k3"], &values)
        .unwrap();

    assert_eq!(
        store.batch_read(&cx(), "t", &["k1", "k2", "k3"], None).unwrap(),
        values
    );
}

#[test]
fn test_batch_read_follows_request_order_not_key_order() {
    let store = create_store();
    store
        .batch_insert(
            &cx(),
            "t",
            &["a", "b", "c"],
            &[fields(&[("v", "a")]), fields(&[("v", "b")]), fields(&[("v", "c")])],
        )
        .unwrap();

    let records = store.batch_read(&cx(), "t", &["c", "a", "b", "a"], None).unwrap();
    let order: Vec<String> = records
        .iter()
        .map(|r| String::from_utf8(r["v"].clone()).unwrap())
        .collect();
    assert_eq!(order, ["c", "a", "b", "a"]);
}

#[test]
fn test_batch_read_with_projection() {
    let store = create_store();
    store
        .insert(&cx(), "t", "k", &fields(&[("a", "1"), ("b", "2")]))
        .unwrap();

    let records = store
        .batch_read(&cx(), "t", &["k"], Some(&["b"][..]))
        .unwrap();
    assert_eq!(records, vec![fields(&[("b", "2")])]);
}

#[test]
fn test_batch_read_missing_key_fails_whole_batch() {
    let store = create_store();
    store.insert(&cx(), "t", "k1", &fields(&[("f", "v")])).unwrap();

    let err = store
        .batch_read(&cx(), "t", &["k1", "ghost"], None)
        .unwrap_err();
    assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "ghost"));
}

#[test]
fn test_batch_read_missing_table() {
    let store = create_store();
    assert!(store
        .batch_read(&cx(), "nope", &["k"], None)
        .unwrap_err()
        .is_table_not_found());
}

#[test]
fn test_batch_insert_replaces_existing() {
    let store = create_store();
    store
        .insert(&cx(), "t", "k", &fields(&[("old", "1"), ("kept", "no")]))
        .unwrap();
    store
        .batch_insert(&cx(), "t", &["k"], &[fields(&[("new", "2")])])
        .unwrap();

    assert_eq!(store.read(&cx(), "t", "k", None).unwrap(), fields(&[("new", "2")]));
}

#[test]
fn test_batch_insert_is_one_transaction() {
    let store = create_store();
    let keys: Vec<String> = (0..50).map(|i| format!("k{i:02}")).collect();
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    let values = vec![fields(&[("f", "v")]); keys.len()];

    store.batch_insert(&cx(), "t", &keys, &values).unwrap();
    assert_eq!(store.metrics().committed, 1);
    assert_eq!(store.scan(&cx(), "t", "", 100, None).unwrap().len(), 50);
}

#[test]
fn test_batch_length_mismatch() {
    let store = create_store();
    let err = store
        .batch_insert(&cx(), "t", &["a"], &[fields(&[]), fields(&[])])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(store.engine().bucket_count(), 0);
}

// =============================================================================
// BATCH UPDATE
// =============================================================================

#[test]
fn test_batch_update_merges_each_record() {
    let store = create_store();
    store
        .batch_insert(
            &cx(),
            "t",
            &["a", "b"],
            &[fields(&[("x", "1"), ("y", "1")]), fields(&[("x", "2"), ("y", "2")])],
        )
        .unwrap();
    store
        .batch_update(
            &cx(),
            "t",
            &["a", "b"],
            &[fields(&[("x", "10")]), fields(&[("z", "20")])],
        )
        .unwrap();

    assert_eq!(
        store.batch_read(&cx(), "t", &["a", "b"], None).unwrap(),
        vec![
            fields(&[("x", "10"), ("y", "1")]),
            fields(&[("x", "2"), ("y", "2"), ("z", "20")]),
        ]
    );
}

#[test]
fn test_batch_update_missing_table() {
    let store = create_store();
    assert!(store
        .batch_update(&cx(), "nope", &["k"], &[fields(&[("f", "v")])])
        .unwrap_err()
        .is_table_not_found());
}

// =============================================================================
// BATCH DELETE
// =============================================================================

#[test]
fn test_batch_delete_removes_listed_keys_only() {
    let store = create_store();
    store
        .batch_insert(
            &cx(),
            "t",
            &["a", "b", "c"],
            &vec![fields(&[("f", "v")]); 3],
        )
        .unwrap();
    store.batch_delete(&cx(), "t", &["a", "c", "ghost"]).unwrap();

    assert!(store.read(&cx(), "t", "a", None).unwrap_err().is_key_not_found());
    assert!(store.read(&cx(), "t", "b", None).is_ok());
    assert!(store.read(&cx(), "t", "c", None).unwrap_err().is_key_not_found());
}

#[test]
fn test_batch_delete_missing_table_is_ok() {
    let store = create_store();
    store.batch_delete(&cx(), "nonexistent", &["k1", "k2"]).unwrap();
    assert_eq!(store.engine().bucket_count(), 0);
}

#[test]
fn test_empty_batches() {
    let store = create_store();
    store.batch_insert(&cx(), "t", &[], &[]).unwrap();
    assert!(store.batch_read(&cx(), "t", &[], None).unwrap().is_empty());
    store.batch_update(&cx(), "t", &[], &[]).unwrap();
    store.batch_delete(&cx(), "t", &[]).unwrap();
}
