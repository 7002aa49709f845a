//! Row model: the [`Record`] trait and row keys.
//!
//! Tables never look inside a row except through [`Record::field`], which
//! performs the raw property lookup used by filters and sorting when no column
//! matches a key. Rows are identified by a [`RowKey`] that is derived either from
//! a named field or from a closure ([`RowKeySource`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A row that can be looked up by property name.
///
/// Implemented for JSON objects so tables can hold rows straight from a
/// GraphQL response. Missing properties resolve to [`Value::Null`].
pub trait Record {
    /// Returns the value stored under `key`, or `Null` when absent.
    fn field(&self, key: &str) -> Value;
}

impl Record for Value {
    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }
}

impl Record for Map<String, Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }
}

/// Stable identifier of a row.
///
/// Selection and expansion are tracked by key, so they survive re-sorting,
/// filtering and paging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    /// Integer identifier (database ids).
    Int(i64),
    /// Any other identifier, compared as text.
    Str(String),
}

impl RowKey {
    /// Derives a key from a JSON value.
    ///
    /// Integers become [`RowKey::Int`], strings become [`RowKey::Str`]. Any other
    /// value is keyed by its JSON text, so `null` keys collide on purpose: rows
    /// without an id cannot be told apart.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Str(n.to_string()), Self::Int),
            Value::String(s) => Self::Str(s.clone()),
            other => Self::Str(other.to_string()),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RowKey {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Closure deriving a key from a row.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> RowKey + Send + Sync>;

/// How a table derives the [`RowKey`] of each row.
pub enum RowKeySource<T> {
    /// Read the named property through [`Record::field`].
    Field(String),
    /// Compute the key with a closure.
    Derive(KeyFn<T>),
}

impl<T> RowKeySource<T> {
    /// Keys rows by a closure.
    pub fn derive(f: impl Fn(&T) -> RowKey + Send + Sync + 'static) -> Self {
        Self::Derive(Arc::new(f))
    }
}

impl<T: Record> RowKeySource<T> {
    /// Returns the key of `row`.
    pub fn key_of(&self, row: &T) -> RowKey {
        match self {
            Self::Field(name) => RowKey::from_value(&row.field(name)),
            Self::Derive(f) => f(row),
        }
    }
}

impl<T> Default for RowKeySource<T> {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl<T> Clone for RowKeySource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(name) => Self::Field(name.clone()),
            Self::Derive(f) => Self::Derive(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for RowKeySource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}
