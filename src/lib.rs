//! shaledb - an embeddable, thread-safe, in-memory relational store
//!
//! This library provides SQL-like set operations without an external
//! database:
//! - Typed columnar tables with schema validation
//! - Logical row ids with tombstone-based deletion
//! - Equality and ordered secondary indexes kept synchronized with the data
//! - A small query algebra (filter, project, order, limit)
//! - Per-table locking safe under many readers and writers
//!
//! ```
//! use shaledb::{ColumnType, CompareOp, Database, IndexKind, Query, Row, Schema};
//!
//! let db = Database::new("app");
//! let users = db
//!     .create_table(
//!         "users",
//!         Schema::builder()
//!             .column("id", ColumnType::Int)
//!             .column("name", ColumnType::Str)
//!             .column("active", ColumnType::Bool)
//!             .build(),
//!     )
//!     .unwrap();
//!
//! users.insert(&Row::new().set("id", 1i64).set("name", "A").set("active", true)).unwrap();
//! db.create_index("users", "active", IndexKind::Equality).unwrap();
//!
//! let result = users
//!     .select(&Query::new().filter("active", CompareOp::Eq, true).select(["name"]))
//!     .unwrap();
//! assert_eq!(result.len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod executor;
pub mod query;
pub mod storage;

pub use catalog::{Column, ColumnType, Database, Schema, SchemaBuilder};
pub use error::{Error, Result};
pub use executor::QueryResult;
pub use query::{Clause, CompareOp, Query};
pub use storage::{Index, IndexKind, Row, RowId, Table, Value};
