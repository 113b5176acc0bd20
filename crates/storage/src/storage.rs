//! Attribute-style key/value container for request vars.
//!
//! Missing keys read as `None` instead of failing. Assigning `Value::Null`
//! through [`Storage::set_attr`] deletes the key, while [`Storage::set_item`]
//! keeps it with a null payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::StorageError;

/// What a key currently holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Missing,
    /// Present, stored with a null payload.
    Null,
    Present(&'a Value),
}

impl<'a> Slot<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => Slot::Missing,
            Some(Value::Null) => Slot::Null,
            Some(v) => Slot::Present(v),
        }
    }

    /// Collapse to a read result: missing and null both read as `None`.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Slot::Present(v) => Some(v),
            Slot::Missing | Slot::Null => None,
        }
    }

    pub fn is_missing(&self) -> bool { matches!(self, Slot::Missing) }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Storage {
    vars: Map<String, Value>,
}

impl Storage {
    pub fn new() -> Self { Self::default() }

    /// Build request vars from decoded `(key, value)` pairs.
    ///
    /// A key seen more than once collects its values into an array, in
    /// arrival order, the way repeated query parameters do.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut vars = Map::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            if let Some(existing) = vars.get_mut(&key) {
                match existing {
                    Value::Array(items) => items.push(value),
                    other => {
                        let first = other.take();
                        *other = Value::Array(vec![first, value]);
                    }
                }
            } else {
                vars.insert(key, value);
            }
        }
        Self { vars }
    }

    pub fn lookup(&self, key: &str) -> Slot<'_> {
        Slot::of(self.vars.get(key))
    }

    /// Attribute-style read (`vars.key`).
    pub fn get_attr(&self, key: &str) -> Option<&Value> {
        self.lookup(key).value()
    }

    /// Item-style read (`vars["key"]`). Same contract as [`Storage::get_attr`].
    pub fn get_item(&self, key: &str) -> Option<&Value> {
        self.lookup(key).value()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.vars.get_mut(key)
    }

    /// Attribute-style write. A null value removes the key.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if value.is_null() {
            if self.vars.remove(&key).is_some() {
                debug!(%key, "storage key cleared by null assignment");
            }
            return;
        }
        self.vars.insert(key, value);
    }

    /// Item-style write. Always stores, null included.
    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.vars.remove(key)
    }

    /// True when the key is present, whatever it holds.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Values of `key` as a slice: empty when missing or null, the array
    /// itself for arrays, a single element for scalars.
    pub fn getlist(&self, key: &str) -> &[Value] {
        match self.vars.get(key) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(value) => std::slice::from_ref(value),
        }
    }

    pub fn getfirst(&self, key: &str) -> Option<&Value> {
        self.getlist(key).first().filter(|v| !v.is_null())
    }

    pub fn getlast(&self, key: &str) -> Option<&Value> {
        self.getlist(key).last().filter(|v| !v.is_null())
    }

    pub fn getfirst_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.getfirst(key).cloned().unwrap_or_else(|| default.into())
    }

    pub fn getlast_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.getlast(key).cloned().unwrap_or_else(|| default.into())
    }

    pub fn len(&self) -> usize { self.vars.len() }

    pub fn is_empty(&self) -> bool { self.vars.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = &String> { self.vars.keys() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.vars.iter() }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub(crate) fn vars_mut(&mut self) -> &mut Map<String, Value> { &mut self.vars }

    pub(crate) fn vars(&self) -> &Map<String, Value> { &self.vars }
}

impl From<Map<String, Value>> for Storage {
    fn from(vars: Map<String, Value>) -> Self { Self { vars } }
}

impl From<Storage> for Value {
    fn from(storage: Storage) -> Self { Value::Object(storage.vars) }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Storage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut storage = Storage::new();
        for (k, v) in iter {
            storage.set_item(k, v);
        }
        storage
    }
}

impl IntoIterator for Storage {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.vars.into_iter() }
}

impl<'a> IntoIterator for &'a Storage {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter { self.vars.iter() }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string(&self.vars).map_err(|_| fmt::Error)?;
        write!(f, "<Storage {body}>")
    }
}
