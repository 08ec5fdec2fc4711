//! Table storage for shaledb
//!
//! A table owns its schema, one columnar store per column, the secondary
//! indexes keyed by column name, the row-id counter and the tombstone set,
//! all behind a single per-table mutex. Every public operation holds the
//! mutex for its full duration, so readers and writers serialize per table
//! while different tables proceed in parallel.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::column::ColumnStore;
use super::index::{Index, IndexKind};
use super::row::Row;
use super::value::Value;
use super::RowId;
use crate::catalog::Schema;
use crate::error::{Error, Result};
use crate::executor::{self, QueryResult};
use crate::query::Query;

/// Mutable table state guarded by the table mutex
///
/// The executor reads this directly while the lock is held; the index
/// maintenance contract (every live row indexed exactly once under its
/// current value, tombstoned rows indexed nowhere, no empty buckets) holds
/// whenever the lock is released.
pub(crate) struct TableInner {
    pub(crate) name: String,
    pub(crate) schema: Schema,
    /// One store per schema column, in schema order
    pub(crate) columns: Vec<ColumnStore>,
    /// Indexes keyed by column name
    pub(crate) indexes: HashMap<String, Index>,
    /// The next row id to assign; ids start at 1 and are never reused
    pub(crate) next_row_id: RowId,
    /// Logically deleted row ids; slots are never reclaimed
    pub(crate) tombstones: HashSet<RowId>,
}

impl TableInner {
    /// The largest row id ever assigned
    pub(crate) fn high_water(&self) -> RowId {
        self.next_row_id - 1
    }

    /// Live row ids, ascending
    pub(crate) fn live_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        (1..=self.high_water()).filter(move |id| !self.tombstones.contains(id))
    }

    /// Read a column value by column position and row id
    pub(crate) fn value_at(&self, col_idx: usize, row_id: RowId) -> Value {
        self.columns[col_idx].value((row_id - 1) as usize)
    }

    /// Check a row's values against the schema without mutating anything
    fn validate_row(&self, row: &Row) -> Result<()> {
        for (column, value) in row.iter() {
            match self.schema.get_column(column) {
                Some(col) => {
                    if !col.column_type.matches(value) {
                        return Err(Error::SchemaMismatch {
                            table: self.name.clone(),
                            column: column.to_string(),
                            expected: col.column_type,
                            found: value.type_name(),
                        });
                    }
                }
                None => {
                    return Err(Error::ColumnNotFound {
                        table: self.name.clone(),
                        column: column.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Append a validated row: one slot per column (missing columns become
    /// null), a fresh row id, and an index entry per indexed column.
    fn append_row(&mut self, row: &Row) -> RowId {
        let id = self.next_row_id;
        self.next_row_id += 1;

        let TableInner {
            schema,
            columns,
            indexes,
            ..
        } = self;
        for (idx, col) in schema.columns().iter().enumerate() {
            let value = row.get(&col.name).cloned().unwrap_or(Value::Null);
            columns[idx].push(&value);
            if let Some(index) = indexes.get_mut(&col.name) {
                index.add(value, id);
            }
        }
        id
    }
}

/// A named, schema-typed columnar table
pub struct Table {
    name: String,
    inner: Mutex<TableInner>,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        let columns = schema
            .columns()
            .iter()
            .map(|c| ColumnStore::new(c.column_type))
            .collect();
        Self {
            inner: Mutex::new(TableInner {
                name: name.clone(),
                schema,
                columns,
                indexes: HashMap::new(),
                next_row_id: 1,
                tombstones: HashSet::new(),
            }),
            name,
        }
    }

    /// Get the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a snapshot of the table schema
    pub fn schema(&self) -> Schema {
        self.inner.lock().schema.clone()
    }

    /// Number of live rows
    pub fn row_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.high_water() as usize - inner.tombstones.len()
    }

    /// Check if the table has no live rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The largest row id ever assigned (equals every column's length)
    pub fn high_water(&self) -> RowId {
        self.inner.lock().high_water()
    }

    /// The indexed columns and their index kinds
    pub fn indexed_columns(&self) -> Vec<(String, IndexKind)> {
        let inner = self.inner.lock();
        inner
            .indexes
            .iter()
            .map(|(column, index)| (column.clone(), index.kind()))
            .collect()
    }

    /// Insert a row
    ///
    /// Columns the row does not name are stored as null. Returns the new
    /// row id, which is also the table's new high-water mark.
    pub fn insert(&self, row: &Row) -> Result<RowId> {
        let mut inner = self.inner.lock();
        inner.validate_row(row)?;
        let id = inner.append_row(row);
        debug!(table = %self.name, row_id = id, "inserted row");
        Ok(id)
    }

    /// Insert several rows under one lock acquisition
    ///
    /// Every row is validated before any is stored; a batch containing an
    /// invalid row inserts nothing.
    pub fn insert_batch(&self, rows: &[Row]) -> Result<Vec<RowId>> {
        let mut inner = self.inner.lock();
        for row in rows {
            inner.validate_row(row)?;
        }
        for column in &mut inner.columns {
            column.reserve(rows.len());
        }
        let ids: Vec<RowId> = rows.iter().map(|row| inner.append_row(row)).collect();
        debug!(table = %self.name, rows = rows.len(), "inserted batch");
        Ok(ids)
    }

    /// Update the columns named in `updates` on every row matching the
    /// filter (every live row when the filter is absent)
    ///
    /// Only the named columns are touched; their old index entries are
    /// removed and new ones added. Update values are schema-checked before
    /// any row is mutated. Names outside the schema are ignored. Returns
    /// the number of updated rows.
    pub fn update(&self, updates: &Row, filter: Option<&Query>) -> Result<usize> {
        let mut inner = self.inner.lock();

        let mut targets: Vec<(String, usize, Value)> = Vec::new();
        for (column, value) in updates.iter() {
            let idx = match inner.schema.index_of(column) {
                Some(idx) => idx,
                None => continue,
            };
            let declared = inner.schema.columns()[idx].column_type;
            if !declared.matches(value) {
                return Err(Error::SchemaMismatch {
                    table: self.name.clone(),
                    column: column.to_string(),
                    expected: declared,
                    found: value.type_name(),
                });
            }
            targets.push((column.to_string(), idx, value.clone()));
        }

        let ids = match filter {
            Some(query) => executor::matching_ids(&inner, query)?,
            None => inner.live_ids().collect(),
        };

        for &id in &ids {
            let slot = (id - 1) as usize;
            for (column, idx, new_value) in &targets {
                let old = inner.columns[*idx].value(slot);
                if let Some(index) = inner.indexes.get_mut(column.as_str()) {
                    index.remove(&old, id);
                }
                inner.columns[*idx].set(slot, new_value);
                if let Some(index) = inner.indexes.get_mut(column.as_str()) {
                    index.add(new_value.clone(), id);
                }
            }
        }

        debug!(table = %self.name, rows = ids.len(), "updated rows");
        Ok(ids.len())
    }

    /// Tombstone every row matching the filter (every live row when the
    /// filter is absent)
    ///
    /// Each deleted row is first removed from every index bucket derived
    /// from its current column values. Returns the number of deleted rows.
    pub fn delete(&self, filter: Option<&Query>) -> Result<usize> {
        let mut inner = self.inner.lock();

        let ids = match filter {
            Some(query) => executor::matching_ids(&inner, query)?,
            None => inner.live_ids().collect(),
        };

        let indexed: Vec<(String, usize)> = inner
            .indexes
            .keys()
            .filter_map(|column| {
                inner
                    .schema
                    .index_of(column)
                    .map(|idx| (column.clone(), idx))
            })
            .collect();

        for &id in &ids {
            let slot = (id - 1) as usize;
            for (column, idx) in &indexed {
                let old = inner.columns[*idx].value(slot);
                if let Some(index) = inner.indexes.get_mut(column.as_str()) {
                    index.remove(&old, id);
                }
            }
            inner.tombstones.insert(id);
        }

        debug!(table = %self.name, rows = ids.len(), "deleted rows");
        Ok(ids.len())
    }

    /// Run a query against this table
    pub fn select(&self, query: &Query) -> Result<QueryResult> {
        let inner = self.inner.lock();
        executor::execute(&inner, query)
    }

    /// Create an index on a column, populated from the current live rows
    pub fn create_index(&self, column: &str, kind: IndexKind) -> Result<()> {
        let mut inner = self.inner.lock();
        let col_idx = inner
            .schema
            .index_of(column)
            .ok_or_else(|| Error::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })?;
        if inner.indexes.contains_key(column) {
            return Err(Error::IndexAlreadyExists {
                table: self.name.clone(),
                column: column.to_string(),
            });
        }

        let mut index = Index::new(kind);
        let live: Vec<RowId> = inner.live_ids().collect();
        for id in live {
            index.add(inner.value_at(col_idx, id), id);
        }
        inner.indexes.insert(column.to_string(), index);

        info!(table = %self.name, column, kind = ?kind, "created index");
        Ok(())
    }

    /// Drop the index on a column
    pub fn drop_index(&self, column: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.indexes.remove(column).is_none() {
            if !inner.schema.has_column(column) {
                return Err(Error::ColumnNotFound {
                    table: self.name.clone(),
                    column: column.to_string(),
                });
            }
            return Err(Error::IndexNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            });
        }
        info!(table = %self.name, column, "dropped index");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.inner.lock().assert_invariants();
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("rows", &self.row_count())
            .finish()
    }
}

#[cfg(test)]
impl TableInner {
    /// Check the structural invariants (column widths, index coverage,
    /// bucket discipline, row-id bounds), panicking on violation.
    fn assert_invariants(&self) {
        let width = self.high_water() as usize;
        for (idx, column) in self.columns.iter().enumerate() {
            assert_eq!(column.len(), width, "column {} width != high-water", idx);
        }

        let live: Vec<RowId> = self.live_ids().collect();
        for (column, index) in &self.indexes {
            let col_idx = self
                .schema
                .index_of(column)
                .expect("indexed column must be in schema");

            for &id in &live {
                let value = self.value_at(col_idx, id);
                let hits = index
                    .lookup_eq(&value)
                    .iter()
                    .filter(|&&entry| entry == id)
                    .count();
                assert_eq!(hits, 1, "live row {} indexed {} times on '{}'", id, hits, column);
            }

            let keys: Vec<Value> = index.keys().cloned().collect();
            for key in keys {
                let bucket = index.lookup_eq(&key);
                assert!(!bucket.is_empty(), "empty bucket for key {} on '{}'", key, column);
                for &id in bucket {
                    assert!(
                        !self.tombstones.contains(&id),
                        "tombstoned row {} indexed on '{}'",
                        id,
                        column
                    );
                    assert!(id >= 1 && id <= self.high_water(), "row id {} out of range", id);
                }
            }

            assert_eq!(
                index.entry_count(),
                live.len(),
                "index on '{}' entry count != live rows",
                column
            );
        }
    }
}
