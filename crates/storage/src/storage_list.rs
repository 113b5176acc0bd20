//! Storage variant whose missing keys read as an empty, growable array.
//!
//! Reading a missing key materializes `[]` under that key, so the key then
//! shows up in `contains`, `len` and iteration.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::StorageError;
use crate::storage::{Slot, Storage};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageList {
    inner: Storage,
}

impl StorageList {
    pub fn new() -> Self { Self::default() }

    /// Attribute-style read. A missing key is bound to a fresh empty array.
    pub fn get_attr(&mut self, key: &str) -> &mut Value {
        let vars = self.inner.vars_mut();
        if !vars.contains_key(key) {
            debug!(key, "materializing empty list for missing key");
        }
        vars.entry(key).or_insert_with(|| Value::Array(Vec::new()))
    }

    /// Item-style read. Same contract as [`StorageList::get_attr`].
    pub fn get_item(&mut self, key: &str) -> &mut Value {
        self.get_attr(key)
    }

    pub fn lookup(&self, key: &str) -> Slot<'_> { self.inner.lookup(key) }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.set_attr(key, value)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.set_item(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> { self.inner.remove(key) }

    pub fn contains(&self, key: &str) -> bool { self.inner.contains(key) }

    pub fn getlist(&self, key: &str) -> &[Value] { self.inner.getlist(key) }

    pub fn getfirst(&self, key: &str) -> Option<&Value> { self.inner.getfirst(key) }

    pub fn getlast(&self, key: &str) -> Option<&Value> { self.inner.getlast(key) }

    pub fn getfirst_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.inner.getfirst_or(key, default)
    }

    pub fn getlast_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.inner.getlast_or(key, default)
    }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = &String> { self.inner.keys() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.inner.iter() }

    pub fn as_storage(&self) -> &Storage { &self.inner }

    pub fn into_storage(self) -> Storage { self.inner }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> { self.inner.to_bytes() }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        Storage::from_bytes(bytes).map(Self::from)
    }
}

impl From<Storage> for StorageList {
    fn from(inner: Storage) -> Self { Self { inner } }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StorageList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

impl IntoIterator for StorageList {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.inner.into_iter() }
}

impl<'a> IntoIterator for &'a StorageList {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter { (&self.inner).into_iter() }
}

impl fmt::Display for StorageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string(self.inner.vars()).map_err(|_| fmt::Error)?;
        write!(f, "<StorageList {body}>")
    }
}
