use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A keyed collection in any of the encodings the runtime hands out.
///
/// All three variants describe the same abstract mapping from key to value.
/// On the wire the variant is picked by shape: a JSON object whose values all
/// decode becomes `Map`, an object with undecodable values is kept verbatim as
/// `Object` (so one malformed entry does not reject the whole frame), and an
/// array of `[key, value]` pairs becomes `Pairs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyedCollection<V> {
    /// Native ordered map; iteration follows insertion order.
    Map(IndexMap<String, V>),
    /// Already normalized `(key, value)` pairs.
    Pairs(Vec<(String, V)>),
    /// Plain keyed structure whose values have not been decoded yet.
    Object(serde_json::Map<String, serde_json::Value>),
}

impl<V> KeyedCollection<V> {
    pub fn empty() -> Self {
        KeyedCollection::Map(IndexMap::new())
    }

    /// Number of raw entries, counting `Object` entries that may later fail to decode.
    pub fn raw_len(&self) -> usize {
        match self {
            KeyedCollection::Map(map) => map.len(),
            KeyedCollection::Pairs(pairs) => pairs.len(),
            KeyedCollection::Object(object) => object.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_len() == 0
    }
}

impl<V> Default for KeyedCollection<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V> FromIterator<(String, V)> for KeyedCollection<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        KeyedCollection::Map(iter.into_iter().collect())
    }
}
