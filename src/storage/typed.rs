//! Typed accessors over a [`Value`] store.
//!
//! Each getter is a thin wrapper around [`StorageEngine::get`]: a miss is
//! `Ok(None)`, a hit of the requested kind is `Ok(Some(..))`, and a hit of any
//! other kind is [`StoreError::TypeMismatch`]. Values are never coerced.
//! A mismatched hit still counts as an access and extends the entry's life when
//! `extend_on_access` is on.

use crate::error::{Result, StoreError};
use crate::storage::engine::StorageEngine;
use crate::value::{Value, ValueKind};
use bytes::Bytes;

impl StorageEngine<Value> {
    fn get_as<T>(
        &self,
        key: &str,
        expected: ValueKind,
        extract: impl FnOnce(Value) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let found = value.kind();
        match extract(value) {
            Some(v) => Ok(Some(v)),
            None => Err(StoreError::TypeMismatch {
                key: key.to_string(),
                expected,
                found,
            }),
        }
    }

    /// Gets `key` as a string.
    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.get_as(key, ValueKind::Str, |value| match value {
            Value::Str(s) => Some(s),
            _ => None,
        })
    }

    /// Gets `key` as an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_as(key, ValueKind::Int, |value| value.as_int())
    }

    /// Gets `key` as a float.
    pub fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_as(key, ValueKind::Float, |value| value.as_float())
    }

    /// Gets `key` as a boolean.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get_as(key, ValueKind::Bool, |value| value.as_bool())
    }

    /// Gets `key` as bytes.
    pub fn get_bytes(&self, key: &str) -> Result<Option<Bytes>> {
        self.get_as(key, ValueKind::Bytes, |value| match value {
            Value::Bytes(b) => Some(b),
            _ => None,
        })
    }
}
