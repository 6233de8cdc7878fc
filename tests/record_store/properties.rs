//! Property tests
//!
//! Store behavior checked against a `BTreeMap` model of one table.

use crate::*;
use proptest::collection::{btree_map, hash_map, vec};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

fn field_map() -> impl Strategy<Value = FieldMap> {
    hash_map("[a-z]{1,8}", vec(any::<u8>(), 0..24), 1..6)
}

fn table() -> impl Strategy<Value = BTreeMap<String, FieldMap>> {
    btree_map("[a-z0-9]{1,6}", field_map(), 0..20)
}

fn load(model: &BTreeMap<String, FieldMap>) -> RecordStore<MemoryEngine> {
    let store = RecordStore::ephemeral();
    // Create the table even when the model is empty
    store.insert(&cx(), "t", "", &FieldMap::new()).unwrap();
    store.delete(&cx(), "t", "").unwrap();
    for (key, record) in model {
        store.insert(&cx(), "t", key, record).unwrap();
    }
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_insert_then_read_is_identity(record in field_map()) {
        let store = RecordStore::ephemeral();
        store.insert(&cx(), "t", "k", &record).unwrap();
        prop_assert_eq!(store.read(&cx(), "t", "k", None).unwrap(), record);
    }

    #[test]
    fn prop_update_is_overlay(base in field_map(), changes in field_map()) {
        let store = RecordStore::ephemeral();
        store.insert(&cx(), "t", "k", &base).unwrap();
        store.update(&cx(), "t", "k", &changes).unwrap();

        let merged = store.read(&cx(), "t", "k", None).unwrap();
        for (name, value) in &changes {
            prop_assert_eq!(&merged[name], value);
        }
        for (name, value) in &base {
            if !changes.contains_key(name) {
                prop_assert_eq!(&merged[name], value);
            }
        }
        let expected: HashSet<&String> = base.keys().chain(changes.keys()).collect();
        prop_assert_eq!(merged.keys().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn prop_read_projection_is_intersection(
        record in field_map(),
        wanted in vec("[a-z]{1,8}", 1..6),
    ) {
        let store = RecordStore::ephemeral();
        store.insert(&cx(), "t", "k", &record).unwrap();

        let names: Vec<&str> = wanted.iter().map(String::as_str).collect();
        let projected = store.read(&cx(), "t", "k", Some(names.as_slice())).unwrap();

        for (name, value) in &projected {
            prop_assert!(names.contains(&name.as_str()));
            prop_assert_eq!(&record[name], value);
        }
        for name in &names {
            prop_assert_eq!(projected.contains_key(*name), record.contains_key(*name));
        }
    }

    #[test]
    fn prop_scan_matches_ordered_model(
        model in table(),
        start in "[a-z0-9]{0,6}",
        count in 0usize..25,
    ) {
        let store = load(&model);
        let scanned = store.scan(&cx(), "t", &start, count, None).unwrap();

        let expected: Vec<FieldMap> = model
            .range(start.clone()..)
            .take(count)
            .map(|(_, record)| record.clone())
            .collect();
        prop_assert!(scanned.len() <= count);
        prop_assert_eq!(scanned, expected);
    }

    #[test]
    fn prop_batch_read_preserves_request_order(
        model in table(),
        picks in vec(any::<prop::sample::Index>(), 0..10),
    ) {
        prop_assume!(!model.is_empty());
        let store = load(&model);
        let keys: Vec<&str> = model.keys().map(String::as_str).collect();
        let requested: Vec<&str> = picks.iter().map(|i| keys[i.index(keys.len())]).collect();

        let records = store.batch_read(&cx(), "t", &requested, None).unwrap();
        prop_assert_eq!(records.len(), requested.len());
        for (key, record) in requested.iter().zip(&records) {
            prop_assert_eq!(&model[*key], record);
        }
    }

    #[test]
    fn prop_failed_batch_leaves_table_untouched(
        model in table(),
        batch in vec(("[a-z0-9]{1,6}", field_map()), 1..8),
        poison_at in any::<prop::sample::Index>(),
    ) {
        let store = load(&model);
        let before = store.scan(&cx(), "t", "", usize::MAX, None).unwrap();

        let keys: Vec<&str> = batch.iter().map(|(k, _)| k.as_str()).collect();
        let mut values: Vec<FieldMap> = batch.iter().map(|(_, v)| v.clone()).collect();
        let at = poison_at.index(values.len());
        values[at] = unencodable();

        prop_assert!(store.batch_insert(&cx(), "t", &keys, &values).unwrap_err().is_codec());
        prop_assert_eq!(store.scan(&cx(), "t", "", usize::MAX, None).unwrap(), before);
    }
}
