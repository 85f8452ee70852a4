//! Source operations
//!
//! The contract between source adapters and the extraction pipeline.
//!
//! # Components
//!
//! - [`SourceOperations`]: row conversion and type mapping, one impl per source
//! - [`UnmappedTypePolicy`]: documented outcome for native types with no mapping
//! - [`CachedSourceOperations`]: thread-safe memoization of type mapping
//! - [`ColumnDescriptor`]: column metadata fed to schema assembly

mod cached;
mod operations;
mod types;

pub use cached::CachedSourceOperations;
pub use operations::SourceOperations;
pub use types::{ColumnDescriptor, UnmappedTypePolicy};
