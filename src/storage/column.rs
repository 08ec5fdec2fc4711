//! Columnar storage for shaledb
//!
//! One typed vector per column plus a null bitmap. Slots are indexed by
//! `row_id - 1` and are never removed; deletion is a tombstone concern
//! handled by the table.

use bitvec::prelude::*;

use crate::catalog::ColumnType;
use crate::storage::Value;

/// Physical storage for column data.
///
/// Each variant wraps a dense vector of a single scalar type so values of
/// one column sit in contiguous memory.
#[derive(Debug)]
enum ColumnData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
    Bool(BitVec),
    Bytes(Vec<Vec<u8>>),
}

impl ColumnData {
    fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int => ColumnData::Int(Vec::new()),
            ColumnType::Float => ColumnData::Float(Vec::new()),
            ColumnType::Str => ColumnData::Str(Vec::new()),
            ColumnType::Bool => ColumnData::Bool(BitVec::new()),
            ColumnType::Bytes => ColumnData::Bytes(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Str(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Bytes(v) => v.len(),
        }
    }

    fn reserve(&mut self, additional: usize) {
        match self {
            ColumnData::Int(v) => v.reserve(additional),
            ColumnData::Float(v) => v.reserve(additional),
            ColumnData::Str(v) => v.reserve(additional),
            ColumnData::Bool(v) => v.reserve(additional),
            ColumnData::Bytes(v) => v.reserve(additional),
        }
    }

    /// Append a placeholder slot so the data vector stays aligned with the
    /// null bitmap.
    fn push_default(&mut self) {
        match self {
            ColumnData::Int(v) => v.push(0),
            ColumnData::Float(v) => v.push(0.0),
            ColumnData::Str(v) => v.push(String::new()),
            ColumnData::Bool(v) => v.push(false),
            ColumnData::Bytes(v) => v.push(Vec::new()),
        }
    }
}

/// A single column's storage: typed data plus null tracking
#[derive(Debug)]
pub(crate) struct ColumnStore {
    data: ColumnData,
    /// A set bit marks the slot as NULL
    nulls: BitVec,
}

impl ColumnStore {
    pub(crate) fn new(column_type: ColumnType) -> Self {
        Self {
            data: ColumnData::new(column_type),
            nulls: BitVec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nulls.len()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
        self.nulls.reserve(additional);
    }

    /// Append a value. The caller has already validated the value against
    /// the declared column type.
    pub(crate) fn push(&mut self, value: &Value) {
        if value.is_null() {
            self.nulls.push(true);
            self.data.push_default();
            return;
        }
        self.nulls.push(false);
        match (&mut self.data, value) {
            (ColumnData::Int(v), Value::Int(i)) => v.push(*i),
            (ColumnData::Float(v), Value::Float(f)) => v.push(*f),
            (ColumnData::Str(v), Value::Str(s)) => v.push(s.clone()),
            (ColumnData::Bool(v), Value::Bool(b)) => v.push(*b),
            (ColumnData::Bytes(v), Value::Bytes(b)) => v.push(b.clone()),
            _ => unreachable!("value type checked against schema by caller"),
        }
    }

    /// Overwrite the value at a slot. The caller has already validated the
    /// value against the declared column type and the slot index against
    /// the column length.
    pub(crate) fn set(&mut self, slot: usize, value: &Value) {
        if value.is_null() {
            self.nulls.set(slot, true);
            return;
        }
        self.nulls.set(slot, false);
        match (&mut self.data, value) {
            (ColumnData::Int(v), Value::Int(i)) => v[slot] = *i,
            (ColumnData::Float(v), Value::Float(f)) => v[slot] = *f,
            (ColumnData::Str(v), Value::Str(s)) => v[slot] = s.clone(),
            (ColumnData::Bool(v), Value::Bool(b)) => v.set(slot, *b),
            (ColumnData::Bytes(v), Value::Bytes(b)) => v[slot] = b.clone(),
            _ => unreachable!("value type checked against schema by caller"),
        }
    }

    /// Read the value at a slot. The slot index is in range for any row id
    /// the table has ever assigned.
    pub(crate) fn value(&self, slot: usize) -> Value {
        if self.nulls[slot] {
            return Value::Null;
        }
        match &self.data {
            ColumnData::Int(v) => Value::Int(v[slot]),
            ColumnData::Float(v) => Value::Float(v[slot]),
            ColumnData::Str(v) => Value::Str(v[slot].clone()),
            ColumnData::Bool(v) => Value::Bool(v[slot]),
            ColumnData::Bytes(v) => Value::Bytes(v[slot].clone()),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_value() {
        let mut col = ColumnStore::new(ColumnType::Int);
        col.push(&Value::Int(42));
        col.push(&Value::Null);
        col.push(&Value::Int(7));

        assert_eq!(col.len(), 3);
        assert_eq!(col.value(0), Value::Int(42));
        assert_eq!(col.value(1), Value::Null);
        assert_eq!(col.value(2), Value::Int(7));
    }

    #[test]
    fn test_data_stays_aligned_with_nulls() {
        let mut col = ColumnStore::new(ColumnType::Str);
        col.push(&Value::Null);
        col.push(&Value::Str("a".to_string()));

        assert_eq!(col.data.len(), col.nulls.len());
        assert_eq!(col.value(1), Value::Str("a".to_string()));
    }

    #[test]
    fn test_set() {
        let mut col = ColumnStore::new(ColumnType::Float);
        col.push(&Value::Float(1.0));
        col.push(&Value::Float(2.0));

        col.set(0, &Value::Float(9.5));
        assert_eq!(col.value(0), Value::Float(9.5));

        col.set(1, &Value::Null);
        assert_eq!(col.value(1), Value::Null);

        // a later non-null write clears the null bit again
        col.set(1, &Value::Float(3.0));
        assert_eq!(col.value(1), Value::Float(3.0));
    }

    #[test]
    fn test_bool_column_is_bitpacked() {
        let mut col = ColumnStore::new(ColumnType::Bool);
        for i in 0..100 {
            col.push(&Value::Bool(i % 2 == 0));
        }
        assert_eq!(col.len(), 100);
        assert_eq!(col.value(0), Value::Bool(true));
        assert_eq!(col.value(1), Value::Bool(false));
    }
}
