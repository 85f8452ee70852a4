//! Document store source support
//!
//! Adapter for document databases that export MongoDB Extended JSON. Each
//! document is one query result; column types are BSON `$type` aliases from
//! schema sampling.

mod operations;
mod types;

pub use operations::DocumentSourceOperations;
pub use types::BsonType;
