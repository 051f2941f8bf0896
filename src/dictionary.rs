use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::Object;

/// An insertion-ordered Name -> Object map.
///
/// PDF itself treats dictionaries as unordered, but ordering must be
/// preserved so that re-serializing an untouched dictionary reproduces the
/// original bytes (invariant 3.1 in the data model). Duplicate keys: the
/// later `set` wins, matching `/Length` and friends being safely
/// overwritable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary(IndexMap<Vec<u8>, Object>);

impl Dictionary {
    pub fn new() -> Self {
        Dictionary(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &[u8]) -> Result<&Object> {
        self.0.get(key).ok_or_else(|| Error::Invariant(format!("missing key /{}", String::from_utf8_lossy(key))))
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Result<&mut Object> {
        self.0
            .get_mut(key)
            .ok_or_else(|| Error::Invariant(format!("missing key /{}", String::from_utf8_lossy(key))))
    }

    pub fn has(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<Vec<u8>>,
        V: Into<Object>,
    {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Object> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &Object)> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Vec<u8>, &mut Object)> {
        self.0.iter_mut()
    }

    /// The `/Type` name, if present.
    pub fn get_type(&self) -> Result<&[u8]> {
        self.get(b"Type").and_then(Object::as_name)
    }

    pub fn has_type(&self, type_name: &[u8]) -> bool {
        self.get_type().map(|t| t == type_name).unwrap_or(false)
    }
}

impl FromIterator<(Vec<u8>, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (Vec<u8>, Object)>>(iter: T) -> Self {
        Dictionary(IndexMap::from_iter(iter))
    }
}
