//! Insertion-ordered string maps and string-or-integer scalars.
//!
//! Environment variables, labels, and extra files are emitted in the order
//! they were declared, so they cannot live in a `HashMap` or `BTreeMap`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that is declared either as a string or as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Text(String),
}

impl Scalar {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

/// A string-keyed map that iterates in insertion order.
///
/// Inserting an existing key replaces its value in place.
///
/// # Examples
///
/// ```
/// use bcigen_core::OrderedMap;
///
/// let mut env: OrderedMap<String> = OrderedMap::new();
/// env.insert("PATH", "/usr/bin".to_owned());
/// env.insert("LANG", "C.UTF-8".to_owned());
/// let keys: Vec<&str> = env.keys().collect();
/// assert_eq!(keys, ["PATH", "LANG"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a table of string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_existing_key_keeps_position() {
        let mut map: OrderedMap<u32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        map.insert("a", 10);
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
        assert_eq!(
            entries,
            vec![("a".to_owned(), 10), ("b".to_owned(), 2), ("c".to_owned(), 3)]
        );
    }

    #[test]
    fn deserialize_keeps_document_order() {
        #[derive(Deserialize)]
        struct Doc {
            env: OrderedMap<Scalar>,
        }

        let doc: Doc = toml::from_str(
            r#"
[env]
ZETA = "last-alphabetically"
ALPHA = 1
MID = "x"
"#,
        )
        .unwrap();

        let keys: Vec<&str> = doc.env.keys().collect();
        assert_eq!(keys, ["ZETA", "ALPHA", "MID"]);
        assert_eq!(doc.env.get("ALPHA"), Some(&Scalar::Integer(1)));
    }

    #[test]
    fn scalar_display() {
        assert_eq!(Scalar::from(11u32).to_string(), "11");
        assert_eq!(Scalar::from("3.11").to_string(), "3.11");
        assert!(Scalar::from("").is_empty());
        assert!(!Scalar::from(0i64).is_empty());
    }
}
