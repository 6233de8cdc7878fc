//! Record value types
//!
//! A record's value is a [`FieldMap`]: field name to raw bytes, with no fixed
//! schema. Field names are opaque strings and iteration order carries no
//! meaning.

use std::collections::HashMap;

/// The value of one record: field name to byte-string value.
pub type FieldMap = HashMap<String, Vec<u8>>;

/// Whether a projection keeps the field called `name`.
///
/// `None` or an empty filter keeps every field. Codecs that project while
/// decoding use this to apply the same rule as [`project`].
pub fn selects(fields: Option<&[&str]>, name: &str) -> bool {
    match fields {
        Some(names) if !names.is_empty() => names.contains(&name),
        _ => true,
    }
}

/// Project `map` down to the requested field names.
///
/// For codecs that decode a whole row before projecting; the binary codec
/// filters with [`selects`] while decoding instead. Requested names that are
/// not present in `map` are omitted, never fabricated.
///
/// # Examples
///
/// ```
/// use recordstore_core::{project, FieldMap};
///
/// let mut map = FieldMap::new();
/// map.insert("field1".into(), b"a".to_vec());
/// map.insert("field2".into(), b"b".to_vec());
///
/// let projected = project(map, Some(&["field1", "missing"][..]));
/// assert_eq!(projected.len(), 1);
/// assert_eq!(projected["field1"], b"a");
/// ```
pub fn project(mut map: FieldMap, fields: Option<&[&str]>) -> FieldMap {
    map.retain(|name, _| selects(fields, name));
    map
}

/// Overlay `changes` onto `base`, field by field.
///
/// Every field named in `changes` is set or overwritten in `base`; fields not
/// named are left untouched.
pub fn overlay(base: &mut FieldMap, changes: &FieldMap) {
    for (name, value) in changes {
        match base.get_mut(name) {
            Some(existing) => {
                existing.clear();
                existing.extend_from_slice(value);
            }
            None => {
                base.insert(name.clone(), value.clone());
            }
        }
    }
}
