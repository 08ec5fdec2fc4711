//! Row values for shaledb
//!
//! A [`Row`] is the column-name → value mapping hosts hand to `insert` and
//! `update`. Columns a row does not mention are filled with NULL at insert
//! time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::storage::Value;

/// A set of named column values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a column value, consuming and returning the row for chaining
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Get a column value
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Check whether the row names a column
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Iterate over (column, value) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns named by this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row names no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
