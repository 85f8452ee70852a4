//! Source operation types

use crate::error::{Error, Result};
use crate::schema::JsonType;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unmapped Type Policy
// ============================================================================

/// How an adapter treats a native type it has no mapping for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedTypePolicy {
    /// Fail with an unsupported type error
    #[default]
    Reject,
    /// Treat the column as an opaque string
    FallbackToString,
}

impl UnmappedTypePolicy {
    /// Tag used for unmapped descriptors, if the policy falls back
    pub fn fallback_type(&self) -> Option<JsonType> {
        match self {
            UnmappedTypePolicy::Reject => None,
            UnmappedTypePolicy::FallbackToString => Some(JsonType::String),
        }
    }

    /// Outcome of mapping a descriptor that has no defined mapping
    pub fn resolve(&self, adapter: &str, descriptor: &str) -> Result<JsonType> {
        match self.fallback_type() {
            Some(fallback) => {
                tracing::debug!(
                    adapter,
                    descriptor,
                    "unmapped source type, falling back to {fallback}"
                );
                Ok(fallback)
            }
            None => Err(Error::unsupported_type(adapter, descriptor)),
        }
    }
}

impl std::fmt::Display for UnmappedTypePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmappedTypePolicy::Reject => write!(f, "reject"),
            UnmappedTypePolicy::FallbackToString => write!(f, "fallback_to_string"),
        }
    }
}

// ============================================================================
// Column Descriptor
// ============================================================================

/// Column metadata from schema introspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor<T> {
    /// Column name
    pub name: String,
    /// Native type descriptor
    pub source_type: T,
    /// Whether the column admits NULL
    pub nullable: bool,
}

impl<T> ColumnDescriptor<T> {
    /// Create a nullable column
    pub fn new(name: impl Into<String>, source_type: T) -> Self {
        Self {
            name: name.into(),
            source_type,
            nullable: true,
        }
    }

    /// Create a NOT NULL column
    pub fn not_null(name: impl Into<String>, source_type: T) -> Self {
        Self {
            name: name.into(),
            source_type,
            nullable: false,
        }
    }
}
