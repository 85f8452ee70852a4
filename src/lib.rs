//! # Solidafy Source Operations
//!
//! The seam between source adapters and the Solidafy extraction pipeline.
//! Every source (relational database, warehouse, document store) implements
//! one two-operation contract, and the pipeline treats all sources uniformly.
//!
//! ## Features
//!
//! - **Row Conversion**: native query result row → normalized JSON record
//! - **Type Mapping**: native column type → primitive JSON type tag
//! - **Explicit Unmapped-Type Policy**: reject, or fall back to string
//! - **Type Cache**: thread-safe memoization of type mapping
//! - **Schema Assembly**: draft-07 stream schema from column metadata
//! - **Adapters**: DuckDB (and everything it attaches), MongoDB Extended JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_source_ops::database::{DuckDbRow, DuckDbSourceOperations};
//! use solidafy_source_ops::{JsonType, SourceOperations};
//!
//! let ops = DuckDbSourceOperations::new();
//!
//! // For each fetched row
//! let row = DuckDbRow::from_row(driver_row)?;
//! let record = ops.row_to_json(&row)?;
//!
//! // For each column's declared type
//! assert_eq!(ops.get_type("VARCHAR")?, JsonType::String);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 SourceOperations<QueryResult, SourceType>       │
//! │  row_to_json(&QueryResult) → JsonObject                         │
//! │  get_type(&SourceType)     → JsonType                           │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!        ┌───────────────────────┼────────────────────────┐
//!        │                       │                        │
//! ┌──────┴───────┐      ┌────────┴────────┐      ┌────────┴────────┐
//! │   DuckDB     │      │    Document     │      │   Cached<S>     │
//! ├──────────────┤      ├─────────────────┤      ├─────────────────┤
//! │ DuckDbRow    │      │ Extended JSON   │      │ memoized        │
//! │ type names   │      │ $type aliases   │      │ get_type        │
//! └──────────────┘      └─────────────────┘      └─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Primitive type taxonomy and stream schemas
pub mod schema;

/// The source operations contract
pub mod source;

/// DuckDB adapter
pub mod database;

/// Document store adapter
pub mod document;

/// Adapter configuration
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use schema::{build_schema, JsonSchema, JsonType};
pub use source::{
    CachedSourceOperations, ColumnDescriptor, SourceOperations, UnmappedTypePolicy,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
