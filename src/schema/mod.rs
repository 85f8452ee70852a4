//! Schema module
//!
//! The primitive type taxonomy shared by all adapters, and the stream schema
//! documents assembled from it.
//!
//! # Features
//!
//! - **Type Tags**: [`JsonType`], the closed set every native type maps into
//! - **Value Checks**: [`JsonType::of`] and [`JsonType::admits`] for normalized values
//! - **Schema Assembly**: [`build_schema`] from adapter column metadata

mod builder;
mod types;

pub use builder::build_schema;
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty, DRAFT_07};
