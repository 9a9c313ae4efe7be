//! One display shape for every keyed collection a frame can carry.
//!
//! Panels never branch on encoding: they call [`normalize`] and get ordered
//! `(key, value)` pairs back. Source order is kept as-is; callers that want a
//! sorted table sort the result themselves.

use indexmap::IndexSet;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use xln_frames::KeyedCollection;

const REPLICA_KEY_SEPARATOR: char = ':';

/// Flattens any encoding into ordered pairs. Absent input yields an empty list.
///
/// `Object` entries that do not decode into `V` are skipped; the rest of the
/// collection still renders.
pub fn normalize<V>(raw: Option<&KeyedCollection<V>>) -> Vec<(String, V)>
where
    V: Clone + DeserializeOwned,
{
    let Some(raw) = raw else {
        return Vec::new();
    };
    match raw {
        KeyedCollection::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        KeyedCollection::Pairs(pairs) => pairs.clone(),
        KeyedCollection::Object(object) => object
            .iter()
            .filter_map(|(key, value)| match V::deserialize(value) {
                Ok(decoded) => Some((key.clone(), decoded)),
                Err(err) => {
                    log::debug!("skipping malformed collection entry '{key}': {err}");
                    None
                }
            })
            .collect(),
    }
}

/// Untyped variant for payloads that never went through a typed frame field.
///
/// Objects enumerate their own keys; arrays are read as `[key, value]` pairs
/// (non-pair elements are skipped). `null`, scalars and missing input are empty.
pub fn normalize_value(raw: Option<&Value>) -> Vec<(String, Value)> {
    match raw {
        Some(Value::Object(object)) => object
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Some(Value::Array(items)) => items.iter().filter_map(pair_from_value).collect(),
        Some(other) if !other.is_null() => {
            log::debug!("unrecognized collection encoding; treating as empty");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn pair_from_value(item: &Value) -> Option<(String, Value)> {
    match item.as_array().map(Vec::as_slice) {
        Some([Value::String(key), value]) => Some((key.clone(), value.clone())),
        Some([Value::Number(key), value]) => Some((key.to_string(), value.clone())),
        _ => {
            log::debug!("skipping non-pair collection element");
            None
        }
    }
}

/// Parts of a `"<entityId>:<signerId>"` replica key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaKey<'a> {
    pub entity_id: &'a str,
    pub signer_id: Option<&'a str>,
}

/// Splits at the first separator. A key without one is all entity id.
pub fn split_replica_key(key: &str) -> ReplicaKey<'_> {
    match key.split_once(REPLICA_KEY_SEPARATOR) {
        Some((entity_id, signer_id)) => ReplicaKey {
            entity_id,
            signer_id: Some(signer_id),
        },
        None => ReplicaKey {
            entity_id: key,
            signer_id: None,
        },
    }
}

pub fn entity_id_of(key: &str) -> &str {
    split_replica_key(key).entity_id
}

/// Replicas belonging to one entity, in collection order.
pub fn replicas_for_entity<'a, V>(pairs: &'a [(String, V)], entity_id: &str) -> Vec<&'a (String, V)> {
    pairs
        .iter()
        .filter(|(key, _)| entity_id_of(key) == entity_id)
        .collect()
}

/// Distinct entity ids in first-seen order.
pub fn entity_ids<V>(pairs: &[(String, V)]) -> Vec<String> {
    let ids: IndexSet<&str> = pairs.iter().map(|(key, _)| entity_id_of(key)).collect();
    ids.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn keys<V>(pairs: &[(String, V)]) -> Vec<&str> {
        pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn absent_and_empty_are_empty() {
        assert!(normalize::<u64>(None).is_empty());
        assert!(normalize(Some(&KeyedCollection::<u64>::empty())).is_empty());
        assert!(normalize_value(None).is_empty());
        assert!(normalize_value(Some(&Value::Null)).is_empty());
        assert!(normalize_value(Some(&json!(42))).is_empty());
    }

    #[test]
    fn every_encoding_yields_same_pairs() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), 1u64);
        map.insert("b".to_string(), 2u64);
        let native = KeyedCollection::Map(map);
        let pairs = KeyedCollection::Pairs(vec![("a".to_string(), 1u64), ("b".to_string(), 2)]);
        let object: KeyedCollection<u64> = match json!({"a": 1, "b": 2}) {
            Value::Object(object) => KeyedCollection::Object(object),
            _ => unreachable!(),
        };

        let expected = vec![("a".to_string(), 1u64), ("b".to_string(), 2)];
        assert_eq!(normalize(Some(&native)), expected);
        assert_eq!(normalize(Some(&pairs)), expected);
        assert_eq!(normalize(Some(&object)), expected);
    }

    #[test]
    fn keeps_source_order_without_sorting() {
        let parsed: KeyedCollection<u64> =
            serde_json::from_value(json!({"10": 1, "2": 2, "b": 3, "a": 4})).unwrap();
        assert_eq!(keys(&normalize(Some(&parsed))), vec!["10", "2", "b", "a"]);
    }

    #[test]
    fn malformed_object_entries_are_skipped() {
        let parsed: KeyedCollection<u64> =
            serde_json::from_value(json!({"ok": 1, "bad": "x", "also": 3})).unwrap();
        assert_eq!(keys(&normalize(Some(&parsed))), vec!["ok", "also"]);
    }

    #[test]
    fn untyped_pair_arrays_normalize() {
        let raw = json!([["E1:S1", {"h": 1}], "junk", [7, true]]);
        let pairs = normalize_value(Some(&raw));
        assert_eq!(keys(&pairs), vec!["E1:S1", "7"]);
        assert_eq!(pairs[1].1, json!(true));
    }

    #[test]
    fn replica_keys_split_on_first_separator() {
        assert_eq!(
            split_replica_key("E1:S1"),
            ReplicaKey {
                entity_id: "E1",
                signer_id: Some("S1")
            }
        );
        assert_eq!(entity_id_of("E1:S1"), "E1");
        assert_eq!(split_replica_key("E1:S1:extra").signer_id, Some("S1:extra"));
        assert_eq!(entity_id_of("no-separator"), "no-separator");
        assert_eq!(split_replica_key("no-separator").signer_id, None);
    }

    #[test]
    fn groups_replicas_by_entity() {
        let pairs = vec![
            ("E2:a".to_string(), 1),
            ("E1:a".to_string(), 2),
            ("E2:b".to_string(), 3),
            ("legacy".to_string(), 4),
        ];
        assert_eq!(entity_ids(&pairs), vec!["E2", "E1", "legacy"]);
        let e2: Vec<i32> = replicas_for_entity(&pairs, "E2").iter().map(|(_, v)| *v).collect();
        assert_eq!(e2, vec![1, 3]);
    }
}
