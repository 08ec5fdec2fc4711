//! Query clause types for shaledb
//!
//! A [`Query`] is a passive, ordered bag of clauses. Consumers append
//! clauses in any order; the executor imposes its own pipeline order and
//! honors only the first `Select`, `OrderBy` and `Limit` clause, while
//! every `Where` clause participates (combined by conjunction in arrival
//! order).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::storage::Value;

/// Comparison operator in a `Where` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// The operator's symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Resolve this operator to its ordering test once, so scan loops do no
    /// per-row operator matching.
    pub(crate) fn ordering_test(self) -> fn(Ordering) -> bool {
        match self {
            CompareOp::Eq => |ord| ord == Ordering::Equal,
            CompareOp::Ne => |ord| ord != Ordering::Equal,
            CompareOp::Lt => |ord| ord == Ordering::Less,
            CompareOp::Le => |ord| ord != Ordering::Greater,
            CompareOp::Gt => |ord| ord == Ordering::Greater,
            CompareOp::Ge => |ord| ord != Ordering::Less,
        }
    }
}

impl FromStr for CompareOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            _ => Err(Error::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single query clause
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Filter rows where the column compares against the value
    Where {
        /// Column to test
        column: String,
        /// Comparison operator
        op: CompareOp,
        /// Value to compare against
        value: Value,
    },
    /// Project to the named columns, in order
    Select {
        /// Columns to emit
        columns: Vec<String>,
    },
    /// Order rows by a column
    OrderBy {
        /// Sort key column
        column: String,
        /// Ascending when true, descending when false
        ascending: bool,
    },
    /// Cap the number of result rows
    Limit {
        /// Maximum rows to emit
        count: usize,
    },
}

/// A query against a single table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    /// Create an empty query (matches all live rows, all columns)
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Append a `Where` clause
    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> Self {
        self.clauses.push(Clause::Where {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Append a `Select` clause
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clauses.push(Clause::Select {
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Append an `OrderBy` clause
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.clauses.push(Clause::OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Append a `Limit` clause
    pub fn limit(mut self, count: usize) -> Self {
        self.clauses.push(Clause::Limit { count });
        self
    }

    /// Append an arbitrary clause
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// The clauses in arrival order
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}
