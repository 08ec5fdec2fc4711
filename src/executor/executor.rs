//! Query executor for shaledb
//!
//! Interprets a [`Query`] against a locked table in a fixed pipeline:
//! seed the live row ids, filter, materialize, sort, limit, project. The
//! caller holds the table lock for the whole pipeline, so every step sees
//! one consistent snapshot.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::query::{Clause, CompareOp, Query};
use crate::storage::table::TableInner;
use crate::storage::{RowId, Value};

/// Result of a select
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Projected column names, in projection order
    pub columns: Vec<String>,
    /// Result rows; each row holds one value per projected column
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a projected column
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Read a cell by row position and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Iterate result rows
    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Resolve the `Where` clauses of a query to the matching live row ids,
/// ascending.
///
/// This is the seed + filter prefix of the pipeline; the mutation paths
/// call it directly so they never re-enter a public entry point while
/// holding the table lock.
pub(crate) fn matching_ids(inner: &TableInner, query: &Query) -> Result<Vec<RowId>> {
    let mut ids: Vec<RowId> = inner.live_ids().collect();

    for clause in query.clauses() {
        let (column, op, value) = match clause {
            Clause::Where { column, op, value } => (column, *op, value),
            _ => continue,
        };
        let col_idx =
            inner
                .schema
                .index_of(column)
                .ok_or_else(|| Error::ColumnNotFound {
                    table: inner.name.clone(),
                    column: column.clone(),
                })?;

        // Equality on an indexed column resolves through the bucket; the
        // intersection keeps `ids` ascending.
        if op == CompareOp::Eq {
            if let Some(index) = inner.indexes.get(column.as_str()) {
                let bucket: HashSet<RowId> = index.lookup_eq(value).iter().copied().collect();
                ids.retain(|id| bucket.contains(id));
                continue;
            }
        }

        // Linear scan. The operator resolves to its ordering test once,
        // outside the row loop.
        let accept = op.ordering_test();
        let mut kept = Vec::with_capacity(ids.len());
        for id in ids {
            if accept(inner.value_at(col_idx, id).compare(value)?) {
                kept.push(id);
            }
        }
        ids = kept;
    }

    Ok(ids)
}

/// Run the full pipeline for a select.
pub(crate) fn execute(inner: &TableInner, query: &Query) -> Result<QueryResult> {
    let mut ids = matching_ids(inner, query)?;

    // Only the first Select/OrderBy/Limit clause is honored.
    let mut select: Option<&[String]> = None;
    let mut order: Option<(&str, bool)> = None;
    let mut limit: Option<usize> = None;
    for clause in query.clauses() {
        match clause {
            Clause::Select { columns } if select.is_none() => select = Some(columns),
            Clause::OrderBy { column, ascending } if order.is_none() => {
                order = Some((column.as_str(), *ascending));
            }
            Clause::Limit { count } if limit.is_none() => limit = Some(*count),
            _ => {}
        }
    }

    if let Some((column, ascending)) = order {
        let col_idx =
            inner
                .schema
                .index_of(column)
                .ok_or_else(|| Error::ColumnNotFound {
                    table: inner.name.clone(),
                    column: column.to_string(),
                })?;
        let mut keyed: Vec<(Value, RowId)> = ids
            .into_iter()
            .map(|id| (inner.value_at(col_idx, id), id))
            .collect();
        // Stable in both directions: the reversed comparator leaves equal
        // keys in their ascending-row-id arrival order.
        if ascending {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        } else {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        }
        ids = keyed.into_iter().map(|(_, id)| id).collect();
    }

    if let Some(count) = limit {
        ids.truncate(count);
    }

    // Projected columns in request order; names outside the schema are
    // omitted. Absent a Select clause, all schema columns in schema order.
    let projection: Vec<(String, usize)> = match select {
        Some(columns) => columns
            .iter()
            .filter_map(|c| inner.schema.index_of(c).map(|idx| (c.clone(), idx)))
            .collect(),
        None => inner
            .schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.name.clone(), idx))
            .collect(),
    };

    let columns: Vec<String> = projection.iter().map(|(name, _)| name.clone()).collect();
    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        rows.push(
            projection
                .iter()
                .map(|&(_, idx)| inner.value_at(idx, id))
                .collect(),
        );
    }

    Ok(QueryResult { columns, rows })
}
