//! Database catalog for shaledb
//!
//! The catalog maps table names to tables. Its lock is held only for
//! create, drop and name lookup; it is always released before a table's
//! own lock is taken, so catalog traffic never serializes table traffic.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::schema::Schema;
use crate::error::{Error, Result};
use crate::storage::{IndexKind, Table};

/// A named collection of tables
pub struct Database {
    name: String,
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl Database {
    /// Create a new empty database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Get the database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a new empty table
    pub fn create_table(&self, name: &str, schema: Schema) -> Result<Arc<Table>> {
        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }
        let table = Arc::new(Table::new(name, schema));
        tables.insert(name.to_string(), table.clone());
        info!(db = %self.name, table = name, "created table");
        Ok(table)
    }

    /// Drop a table, releasing its storage and indexes
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.remove(name).is_none() {
            return Err(Error::TableNotFound(name.to_string()));
        }
        info!(db = %self.name, table = name, "dropped table");
        Ok(())
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        let tables = self.tables.read();
        tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// List all table names
    pub fn list_tables(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Create an index on a table column
    ///
    /// The new index is populated from the table's current live rows in a
    /// single critical section on the table's own lock.
    pub fn create_index(&self, table: &str, column: &str, kind: IndexKind) -> Result<()> {
        let table = self.get_table(table)?;
        table.create_index(column, kind)
    }

    /// Drop the index on a table column
    pub fn drop_index(&self, table: &str, column: &str) -> Result<()> {
        let table = self.get_table(table)?;
        table.drop_index(column)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("tables", &self.list_tables())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnType;
    use crate::storage::Row;

    fn users_schema() -> Schema {
        Schema::builder()
            .column("id", ColumnType::Int)
            .column("name", ColumnType::Str)
            .build()
    }

    #[test]
    fn test_create_and_get_table() {
        let db = Database::new("app");

        let table = db.create_table("users", users_schema()).unwrap();
        assert_eq!(table.name(), "users");

        let retrieved = db.get_table("users").unwrap();
        assert_eq!(retrieved.name(), "users");
        assert!(db.table_exists("users"));
    }

    #[test]
    fn test_create_duplicate_table_fails() {
        let db = Database::new("app");
        db.create_table("t", Schema::new()).unwrap();

        let result = db.create_table("t", Schema::new());
        assert_eq!(result.unwrap_err(), Error::TableAlreadyExists("t".to_string()));
    }

    #[test]
    fn test_drop_table() {
        let db = Database::new("app");
        db.create_table("t", Schema::new()).unwrap();

        db.drop_table("t").unwrap();
        assert!(!db.table_exists("t"));
        assert_eq!(
            db.drop_table("t").unwrap_err(),
            Error::TableNotFound("t".to_string())
        );
    }

    #[test]
    fn test_get_missing_table_fails() {
        let db = Database::new("app");
        assert_eq!(
            db.get_table("nope").unwrap_err(),
            Error::TableNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_list_tables() {
        let db = Database::new("app");
        db.create_table("a", Schema::new()).unwrap();
        db.create_table("b", Schema::new()).unwrap();

        let mut names = db.list_tables();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_index_ddl_through_catalog() {
        let db = Database::new("app");
        db.create_table("users", users_schema()).unwrap();

        db.create_index("users", "name", IndexKind::Equality).unwrap();
        assert_eq!(
            db.create_index("users", "name", IndexKind::Equality)
                .unwrap_err(),
            Error::IndexAlreadyExists {
                table: "users".to_string(),
                column: "name".to_string(),
            }
        );

        db.drop_index("users", "name").unwrap();
        assert_eq!(
            db.drop_index("users", "name").unwrap_err(),
            Error::IndexNotFound {
                table: "users".to_string(),
                column: "name".to_string(),
            }
        );

        assert_eq!(
            db.create_index("ghost", "name", IndexKind::Equality)
                .unwrap_err(),
            Error::TableNotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_dropped_table_handle_stays_usable() {
        let db = Database::new("app");
        let table = db.create_table("users", users_schema()).unwrap();
        table.insert(&Row::new().set("id", 1i64)).unwrap();

        db.drop_table("users").unwrap();

        // the host-held handle still works; storage is freed when it drops
        assert_eq!(table.row_count(), 1);
        assert!(!db.table_exists("users"));
    }
}
