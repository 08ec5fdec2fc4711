//! Catalog module for shaledb

pub mod database;
pub mod schema;
pub mod types;

pub use database::Database;
pub use schema::{Column, Schema, SchemaBuilder};
pub use types::ColumnType;
