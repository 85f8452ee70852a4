//! Adapter configuration
//!
//! Each adapter reads its option block from a YAML (or JSON) document:
//!
//! ```yaml
//! kind: source_ops
//! duckdb:
//!   unmapped_types: reject
//! document:
//!   unmapped_types: fallback_to_string
//! ```
//!
//! Omitted blocks and fields take each adapter's documented default.

use crate::error::{Error, Result, ResultExt};
use crate::source::UnmappedTypePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Options for every built-in adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceOpsConfig {
    /// Kind of config (always "source_ops")
    #[serde(default = "default_kind")]
    pub kind: String,

    /// DuckDB adapter options
    #[serde(default)]
    pub duckdb: DuckDbOptions,

    /// Document adapter options
    #[serde(default)]
    pub document: DocumentOptions,
}

fn default_kind() -> String {
    "source_ops".to_string()
}

impl Default for SourceOpsConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            duckdb: DuckDbOptions::default(),
            document: DocumentOptions::default(),
        }
    }
}

// ============================================================================
// Adapter Options
// ============================================================================

/// DuckDB adapter options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuckDbOptions {
    /// Policy for types with no mapping (default: reject)
    #[serde(default)]
    pub unmapped_types: UnmappedTypePolicy,
}

impl Default for DuckDbOptions {
    fn default() -> Self {
        Self {
            unmapped_types: UnmappedTypePolicy::Reject,
        }
    }
}

/// Document adapter options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentOptions {
    /// Policy for BSON types with no mapping (default: fallback to string)
    #[serde(default = "default_document_policy")]
    pub unmapped_types: UnmappedTypePolicy,
}

fn default_document_policy() -> UnmappedTypePolicy {
    UnmappedTypePolicy::FallbackToString
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            unmapped_types: default_document_policy(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load adapter options from a YAML or JSON file
pub fn load_config(path: impl AsRef<Path>) -> Result<SourceOpsConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: SourceOpsConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    validate_config(&config)?;
    tracing::debug!(
        path = %path.display(),
        duckdb = %config.duckdb.unmapped_types,
        document = %config.document.unmapped_types,
        "loaded source ops config"
    );
    Ok(config)
}

/// Load adapter options from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<SourceOpsConfig> {
    let config: SourceOpsConfig = serde_yaml::from_str(yaml)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &SourceOpsConfig) -> Result<()> {
    if config.kind != "source_ops" {
        return Err(Error::invalid_config(
            "kind",
            format!("expected 'source_ops', got '{}'", config.kind),
        ));
    }
    Ok(())
}
