//! Error types for shaledb
//!
//! This module defines all error types used throughout the store.

use thiserror::Error;

use crate::catalog::ColumnType;

/// The main error type for shaledb
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ========== Catalog Errors ==========
    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("no index on column '{column}' of table '{table}'")]
    IndexNotFound { table: String, column: String },

    #[error("index on column '{column}' of table '{table}' already exists")]
    IndexAlreadyExists { table: String, column: String },

    // ========== Schema Errors ==========
    #[error("column '{column}' of table '{table}' holds {expected}, got {found}")]
    SchemaMismatch {
        table: String,
        column: String,
        expected: ColumnType,
        found: &'static str,
    },

    // ========== Type Errors ==========
    #[error("cannot compare {left} with {right}")]
    TypeError {
        left: &'static str,
        right: &'static str,
    },

    // ========== Query Errors ==========
    #[error("unknown comparison operator '{0}'")]
    InvalidOperator(String),
}

/// Result type alias for shaledb operations
pub type Result<T> = std::result::Result<T, Error>;
