//! Query execution module for shaledb

mod executor;

pub use executor::QueryResult;
pub(crate) use executor::{execute, matching_ids};
