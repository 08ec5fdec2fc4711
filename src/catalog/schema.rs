//! Schema definitions for shaledb
//!
//! This module defines table schemas and column metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::ColumnType;

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
}

impl Column {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Table schema - an ordered mapping from column name to column type
///
/// Column names are unique per table. The schema is fixed when the table is
/// created and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<Column>,
    /// Column name to position mapping
    name_to_index: HashMap<String, usize>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            name_to_index: HashMap::new(),
        }
    }

    /// Create a schema from a list of columns
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let mut schema = Self::new();
        for col in columns {
            schema.add_column(col);
        }
        schema
    }

    /// Start building a schema with the fluent builder
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Add a column to the schema
    ///
    /// A column whose name is already present replaces the earlier
    /// definition in place; positions of other columns are unaffected.
    pub fn add_column(&mut self, column: Column) {
        if let Some(&idx) = self.name_to_index.get(&column.name) {
            self.columns[idx] = column;
            return;
        }
        self.name_to_index
            .insert(column.name.clone(), self.columns.len());
        self.columns.push(column);
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.name_to_index.get(name).map(|&idx| &self.columns[idx])
    }

    /// Get column position by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Get all columns in declaration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for schemas with a fluent API
pub struct SchemaBuilder {
    columns: Vec<Column>,
}

impl SchemaBuilder {
    /// Start an empty builder
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Add a column
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(Column::new(name, column_type));
        self
    }

    /// Finish building the schema
    pub fn build(self) -> Schema {
        Schema::from_columns(self.columns)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let mut schema = Schema::new();
        schema.add_column(Column::new("id", ColumnType::Int));
        schema.add_column(Column::new("name", ColumnType::Str));
        schema.add_column(Column::new("active", ColumnType::Bool));

        assert_eq!(schema.column_count(), 3);
        assert!(schema.has_column("id"));
        assert!(!schema.has_column("unknown"));
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(
            schema.get_column("active").map(|c| c.column_type),
            Some(ColumnType::Bool)
        );
    }

    #[test]
    fn test_schema_builder() {
        let schema = Schema::builder()
            .column("id", ColumnType::Int)
            .column("price", ColumnType::Float)
            .build();

        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.column_names(), vec!["id", "price"]);
    }

    #[test]
    fn test_duplicate_column_replaces() {
        let schema = Schema::builder()
            .column("id", ColumnType::Int)
            .column("id", ColumnType::Str)
            .build();

        assert_eq!(schema.column_count(), 1);
        assert_eq!(
            schema.get_column("id").map(|c| c.column_type),
            Some(ColumnType::Str)
        );
    }
}
