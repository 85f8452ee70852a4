//! Database source support via DuckDB
//!
//! DuckDB is the query engine for every relational source (PostgreSQL,
//! MySQL and SQLite are attached through DuckDB extensions), so one adapter
//! covers all of them.

mod operations;
mod row;
mod types;

pub use operations::DuckDbSourceOperations;
pub use row::DuckDbRow;
pub use types::DuckDbType;
