//! Common types used throughout the source operations crate

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
///
/// Built with serde_json's `preserve_order` feature, so keys iterate in
/// insertion order. A normalized record keeps its source column order.
pub type JsonObject = serde_json::Map<String, JsonValue>;
