// src/engine/context.rs

//! The data context threaded through a traversal.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{NagareError, Result};

/// Free-form keyed document handed to every task module.
///
/// Whether one instance is shared by the whole run or each branch works on
/// its own copy is decided by the run's `propagate` flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContext(Map<String, Value>);

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON value. Only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NagareError::ConfigError(format!(
                "data context must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Structurally independent copy: nothing reachable from the copy is
    /// shared with `self`.
    pub fn deep_copy(&self) -> Self {
        Self(self.0.clone())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Swap the whole contents for `map`, keeping this instance (and so any
    /// sharing between nodes) intact.
    pub fn replace(&mut self, map: Map<String, Value>) {
        self.0 = map;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
