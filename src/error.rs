//! Error types for Solidafy source operations
//!
//! Every adapter reports failures through the [`Error`] defined here.
//! Row conversion and type mapping failures carry the adapter name and the
//! offending column or descriptor so the caller can attribute them.

use thiserror::Error;

/// The main error type for source operations
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Row Conversion Errors
    // ============================================================================
    #[error("[{adapter}] cannot convert column '{column}': {message}")]
    UnrepresentableValue {
        adapter: String,
        column: String,
        message: String,
    },

    #[error("[{adapter}] duplicate column '{column}'")]
    DuplicateColumn { adapter: String, column: String },

    // ============================================================================
    // Type Mapping Errors
    // ============================================================================
    #[error("[{adapter}] unsupported source type '{descriptor}'")]
    UnsupportedType { adapter: String, descriptor: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Driver Errors
    // ============================================================================
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an unrepresentable value error
    pub fn unrepresentable(
        adapter: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnrepresentableValue {
            adapter: adapter.into(),
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate column error
    pub fn duplicate_column(adapter: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            adapter: adapter.into(),
            column: column.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(adapter: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self::UnsupportedType {
            adapter: adapter.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the adapter that raised this error, if any
    pub fn adapter(&self) -> Option<&str> {
        match self {
            Error::UnrepresentableValue { adapter, .. }
            | Error::DuplicateColumn { adapter, .. }
            | Error::UnsupportedType { adapter, .. } => Some(adapter),
            _ => None,
        }
    }

    /// Check if this error was raised while converting a row
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            Error::UnrepresentableValue { .. } | Error::DuplicateColumn { .. }
        )
    }

    /// Check if this error was raised while mapping a source type
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Error::UnsupportedType { .. })
    }
}

/// Result type alias for source operations
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
