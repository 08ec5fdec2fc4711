//! Secondary indexes for shaledb
//!
//! An index maps a column value to the ordered multiset of live row ids
//! holding that value. Two variants share one surface: the equality index
//! is an unordered map for point lookups; the ordered index keeps its keys
//! in ascending value order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::storage::{RowId, Value};

const EMPTY_BUCKET: &[RowId] = &[];

/// The kind of index to build on a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// Point-equality lookups only
    Equality,
    /// Point-equality lookups plus ascending key iteration
    Ordered,
}

/// An index over one column
///
/// Index operations never fail; they are pure data-structure updates the
/// owning table invokes under its own lock. Buckets are never left empty:
/// removing the last row id of a key removes the key.
#[derive(Debug)]
pub enum Index {
    /// Unordered value map
    Equality(HashMap<Value, Vec<RowId>>),
    /// Value map iterating keys in ascending order
    Ordered(BTreeMap<Value, Vec<RowId>>),
}

impl Index {
    /// Create an empty index of the given kind
    pub fn new(kind: IndexKind) -> Self {
        match kind {
            IndexKind::Equality => Index::Equality(HashMap::new()),
            IndexKind::Ordered => Index::Ordered(BTreeMap::new()),
        }
    }

    /// Get this index's kind
    pub fn kind(&self) -> IndexKind {
        match self {
            Index::Equality(_) => IndexKind::Equality,
            Index::Ordered(_) => IndexKind::Ordered,
        }
    }

    /// Add a row id to the bucket for a value
    pub fn add(&mut self, value: Value, row_id: RowId) {
        match self {
            Index::Equality(map) => map.entry(value).or_default().push(row_id),
            Index::Ordered(map) => map.entry(value).or_default().push(row_id),
        }
    }

    /// Remove the first occurrence of a row id from the bucket for a value
    ///
    /// Removing the last occupant deletes the key entirely.
    pub fn remove(&mut self, value: &Value, row_id: RowId) {
        match self {
            Index::Equality(map) => {
                if let Some(bucket) = map.get_mut(value) {
                    if let Some(pos) = bucket.iter().position(|&id| id == row_id) {
                        bucket.remove(pos);
                    }
                    if bucket.is_empty() {
                        map.remove(value);
                    }
                }
            }
            Index::Ordered(map) => {
                if let Some(bucket) = map.get_mut(value) {
                    if let Some(pos) = bucket.iter().position(|&id| id == row_id) {
                        bucket.remove(pos);
                    }
                    if bucket.is_empty() {
                        map.remove(value);
                    }
                }
            }
        }
    }

    /// Look up the row ids holding a value
    ///
    /// Returns an empty slice when the value is absent.
    pub fn lookup_eq(&self, value: &Value) -> &[RowId] {
        match self {
            Index::Equality(map) => map.get(value).map_or(EMPTY_BUCKET, Vec::as_slice),
            Index::Ordered(map) => map.get(value).map_or(EMPTY_BUCKET, Vec::as_slice),
        }
    }

    /// Iterate all keys currently present
    ///
    /// The ordered variant yields keys in ascending value order; the
    /// equality variant yields them in no particular order.
    pub fn keys(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Index::Equality(map) => Box::new(map.keys()),
            Index::Ordered(map) => Box::new(map.keys()),
        }
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        match self {
            Index::Equality(map) => map.len(),
            Index::Ordered(map) => map.len(),
        }
    }

    /// Total number of row-id entries across all buckets
    pub fn entry_count(&self) -> usize {
        match self {
            Index::Equality(map) => map.values().map(Vec::len).sum(),
            Index::Ordered(map) => map.values().map(Vec::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut index = Index::new(IndexKind::Equality);
        index.add(Value::Int(10), 1);
        index.add(Value::Int(10), 3);
        index.add(Value::Int(20), 2);

        assert_eq!(index.lookup_eq(&Value::Int(10)), &[1, 3]);
        assert_eq!(index.lookup_eq(&Value::Int(20)), &[2]);
        assert_eq!(index.lookup_eq(&Value::Int(99)), &[] as &[RowId]);
    }

    #[test]
    fn test_remove_drops_empty_bucket() {
        let mut index = Index::new(IndexKind::Equality);
        index.add(Value::Str("a".to_string()), 1);
        index.add(Value::Str("a".to_string()), 2);

        index.remove(&Value::Str("a".to_string()), 1);
        assert_eq!(index.lookup_eq(&Value::Str("a".to_string())), &[2]);
        assert_eq!(index.key_count(), 1);

        index.remove(&Value::Str("a".to_string()), 2);
        assert_eq!(index.key_count(), 0);
    }

    #[test]
    fn test_remove_first_occurrence_only() {
        let mut index = Index::new(IndexKind::Equality);
        index.add(Value::Int(5), 7);
        index.add(Value::Int(5), 7);

        index.remove(&Value::Int(5), 7);
        assert_eq!(index.lookup_eq(&Value::Int(5)), &[7]);
    }

    #[test]
    fn test_ordered_keys_ascending() {
        let mut index = Index::new(IndexKind::Ordered);
        index.add(Value::Int(30), 3);
        index.add(Value::Int(10), 1);
        index.add(Value::Int(20), 2);

        let keys: Vec<&Value> = index.keys().collect();
        assert_eq!(
            keys,
            vec![&Value::Int(10), &Value::Int(20), &Value::Int(30)]
        );
    }

    #[test]
    fn test_null_is_a_key() {
        let mut index = Index::new(IndexKind::Ordered);
        index.add(Value::Null, 2);
        index.add(Value::Int(1), 1);

        assert_eq!(index.lookup_eq(&Value::Null), &[2]);
        // null orders before every non-null key
        let keys: Vec<&Value> = index.keys().collect();
        assert_eq!(keys[0], &Value::Null);
    }

    #[test]
    fn test_counts() {
        let mut index = Index::new(IndexKind::Equality);
        index.add(Value::Bool(true), 1);
        index.add(Value::Bool(true), 2);
        index.add(Value::Bool(false), 3);

        assert_eq!(index.key_count(), 2);
        assert_eq!(index.entry_count(), 3);
    }
}
