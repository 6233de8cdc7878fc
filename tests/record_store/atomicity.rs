//! All-or-nothing tests
//!
//! A failure anywhere in a write operation must leave every key it touched
//! in its pre-operation state, including tables the operation would have
//! created.

use crate::*;
use recordstore::{Error, RedbEngine};
use tempfile::TempDir;

fn snapshot<E: KvEngine, C: RowCodec>(
    store: &RecordStore<E, C>,
    keys: &[&str],
) -> Vec<Option<FieldMap>> {
    keys.iter()
        .map(|key| store.read(&cx(), "t", key, None).ok())
        .collect()
}

// =============================================================================
// ENCODE FAILURES
// =============================================================================

#[test]
fn test_batch_insert_encode_failure_persists_nothing() {
    let store = create_store();
    store.insert(&cx(), "t", "k1", &fields(&[("v", "before")])).unwrap();
    let keys = ["k0", "k1", "k2", "k3"];
    let before = snapshot(&store, &keys);

    let err = store
        .batch_insert(
            &cx(),
            "t",
            &keys,
            &[
                fields(&[("v", "0")]),
                fields(&[("v", "1")]),
                unencodable(),
                fields(&[("v", "3")]),
            ],
        )
        .unwrap_err();

    assert!(err.is_codec());
    assert_eq!(snapshot(&store, &keys), before);
    assert_eq!(store.metrics().rolled_back, 1);
}

#[test]
fn test_batch_insert_failure_does_not_create_table() {
    let store = create_poison_store();
    let err = store
        .batch_insert(
            &cx(),
            "fresh",
            &["a", "b"],
            &[fields(&[("v", "1")]), fields(&[("poison", "1")])],
        )
        .unwrap_err();

    assert!(err.is_codec());
    assert_eq!(store.engine().bucket_count(), 0);
    assert!(store.read(&cx(), "fresh", "a", None).unwrap_err().is_table_not_found());
}

#[test]
fn test_insert_encode_failure_keeps_previous_record() {
    let store = create_poison_store();
    store.insert(&cx(), "t", "k", &fields(&[("v", "good")])).unwrap();

    assert!(store
        .insert(&cx(), "t", "k", &fields(&[("poison", "x")]))
        .unwrap_err()
        .is_codec());
    assert_eq!(store.read(&cx(), "t", "k", None).unwrap(), fields(&[("v", "good")]));
}

#[test]
fn test_update_encode_failure_keeps_previous_record() {
    let store = create_poison_store();
    store.insert(&cx(), "t", "k", &fields(&[("v", "good")])).unwrap();

    assert!(store
        .update(&cx(), "t", "k", &fields(&[("poison", "x")]))
        .unwrap_err()
        .is_codec());
    assert_eq!(store.read(&cx(), "t", "k", None).unwrap(), fields(&[("v", "good")]));
}

#[test]
fn test_batch_update_encode_failure_rolls_back_earlier_items() {
    let store = create_poison_store();
    let keys = ["a", "b", "c"];
    store
        .batch_insert(&cx(), "t", &keys, &vec![fields(&[("v", "orig")]); 3])
        .unwrap();
    let before = snapshot(&store, &keys);

    let err = store
        .batch_update(
            &cx(),
            "t",
            &keys,
            &[
                fields(&[("v", "new")]),
                fields(&[("v", "new")]),
                fields(&[("poison", "1")]),
            ],
        )
        .unwrap_err();

    assert!(err.is_codec());
    assert_eq!(snapshot(&store, &keys), before);
}

// =============================================================================
// DECODE FAILURES
// =============================================================================

#[test]
fn test_batch_update_decode_failure_rolls_back_earlier_items() {
    let store = create_store();
    let keys = ["a", "b", "c"];
    store
        .batch_insert(&cx(), "t", &keys, &vec![fields(&[("v", "orig")]); 3])
        .unwrap();
    corrupt_row(&store, "t", "c");
    let before = snapshot(&store, &["a", "b"]);

    let err = store
        .batch_update(&cx(), "t", &keys, &vec![fields(&[("v", "new")]); 3])
        .unwrap_err();

    assert!(err.is_codec());
    assert_eq!(snapshot(&store, &["a", "b"]), before);
}

#[test]
fn test_update_decode_failure_writes_nothing() {
    let store = create_store();
    corrupt_row(&store, "t", "k");
    assert!(store
        .update(&cx(), "t", "k", &fields(&[("v", "x")]))
        .unwrap_err()
        .is_codec());
    // Still the corrupt row, not a half-merged one
    assert!(store.read(&cx(), "t", "k", None).unwrap_err().is_codec());
}

// =============================================================================
// MISSING KEYS
// =============================================================================

#[test]
fn test_batch_update_missing_key_rolls_back_earlier_items() {
    let store = create_store();
    store
        .batch_insert(&cx(), "t", &["a", "b"], &vec![fields(&[("v", "orig")]); 2])
        .unwrap();

    let err = store
        .batch_update(
            &cx(),
            "t",
            &["a", "ghost", "b"],
            &vec![fields(&[("v", "new")]); 3],
        )
        .unwrap_err();

    assert!(err.is_key_not_found());
    for key in ["a", "b"] {
        assert_eq!(store.read(&cx(), "t", key, None).unwrap()["v"], b"orig");
    }
}

// =============================================================================
// DISK BACKEND
// =============================================================================

#[test]
fn test_disk_batch_insert_failure_persists_nothing() {
    let store = create_disk_store();
    store.insert(&cx(), "t", "k0", &fields(&[("v", "before")])).unwrap();
    let keys = ["k0", "k1", "k2"];
    let before = snapshot(&store, &keys);

    assert!(store
        .batch_insert(
            &cx(),
            "t",
            &keys,
            &[fields(&[("v", "0")]), fields(&[("v", "1")]), unencodable()],
        )
        .unwrap_err()
        .is_codec());
    assert_eq!(snapshot(&store, &keys), before);
}

#[test]
fn test_disk_insert_failure_does_not_create_table() {
    let store = create_disk_store();
    assert!(store
        .insert(&cx(), "fresh", "k", &unencodable())
        .unwrap_err()
        .is_codec());
    assert!(store
        .scan(&cx(), "fresh", "", 1, None)
        .unwrap_err()
        .is_table_not_found());
}

// =============================================================================
// ENGINE FAILURES
// =============================================================================

fn run_batch_delete_engine_failure<E: KvEngine>(store: RecordStore<FaultyEngine<E>>) {
    let keys = ["a", "poison", "c"];
    store
        .batch_insert(
            &cx(),
            "t",
            &keys,
            &[fields(&[("v", "a")]), fields(&[("v", "p")]), fields(&[("v", "c")])],
        )
        .unwrap();
    let before = snapshot(&store, &keys);

    let err = store.batch_delete(&cx(), "t", &keys).unwrap_err();

    assert!(matches!(err, Error::Engine(_)));
    assert_eq!(snapshot(&store, &keys), before);
    assert_eq!(store.read(&cx(), "t", "a", None).unwrap(), fields(&[("v", "a")]));
    assert_eq!(store.metrics().committed, 1);
    assert_eq!(store.metrics().rolled_back, 1);
}

#[test]
fn test_batch_delete_engine_failure_restores_earlier_deletes() {
    init_tracing();
    let engine = FaultyEngine::failing_delete(MemoryEngine::new(), "poison");
    run_batch_delete_engine_failure(RecordStore::with_engine(engine, BinaryRowCodec::new()));
}

#[test]
fn test_disk_batch_delete_engine_failure_restores_earlier_deletes() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let redb = RedbEngine::open(dir.path().join("records.redb")).unwrap();
    let engine = FaultyEngine::failing_delete(redb, "poison");
    run_batch_delete_engine_failure(RecordStore::with_engine(engine, BinaryRowCodec::new()));
}

#[test]
fn test_failed_commit_counts_as_rollback() {
    init_tracing();
    let engine = FaultyEngine::failing_commit(MemoryEngine::new());
    let store = RecordStore::with_engine(engine, BinaryRowCodec::new());

    let err = store
        .insert(&cx(), "t", "k", &fields(&[("v", "1")]))
        .unwrap_err();

    assert!(matches!(err, Error::Engine(ref msg) if msg.contains("commit")));
    assert!(store.read(&cx(), "t", "k", None).unwrap_err().is_table_not_found());
    assert_eq!(store.metrics().committed, 0);
    assert_eq!(store.metrics().rolled_back, 1);
}
