//! Column types for shaledb
//!
//! This module defines the scalar types a table column may hold.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Value;

/// The declared type of a table column
///
/// One tag per non-null value variant. Declared at table creation and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    Str,
    /// Boolean
    Bool,
    /// Opaque byte buffer
    Bytes,
}

impl ColumnType {
    /// Check whether a value may be stored in a column of this type.
    ///
    /// Null is storable in any column; there is no per-column nullability.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (ColumnType::Int, Value::Int(_))
                | (ColumnType::Float, Value::Float(_))
                | (ColumnType::Str, Value::Str(_))
                | (ColumnType::Bool, Value::Bool(_))
                | (ColumnType::Bytes, Value::Bytes(_))
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Str => write!(f, "STRING"),
            ColumnType::Bool => write!(f, "BOOL"),
            ColumnType::Bytes => write!(f, "BYTES"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        assert!(ColumnType::Int.matches(&Value::Int(1)));
        assert!(!ColumnType::Int.matches(&Value::Str("1".to_string())));
        assert!(ColumnType::Float.matches(&Value::Float(1.5)));
        assert!(ColumnType::Bytes.matches(&Value::Bytes(vec![0x01])));
    }

    #[test]
    fn test_null_matches_any_type() {
        for ty in [
            ColumnType::Int,
            ColumnType::Float,
            ColumnType::Str,
            ColumnType::Bool,
            ColumnType::Bytes,
        ] {
            assert!(ty.matches(&Value::Null));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ColumnType::Int.to_string(), "INT");
        assert_eq!(ColumnType::Str.to_string(), "STRING");
    }
}
