//! Owned snapshot of one DuckDB result row

use crate::error::Result;
use duckdb::types::Value;

/// One fetched row: column names and values in result order.
///
/// `duckdb::Row` borrows its statement, so the adapter works on this owned
/// copy. Duplicate column names are kept as-is; conversion rejects them.
#[derive(Debug, Clone, Default)]
pub struct DuckDbRow {
    columns: Vec<(String, Value)>,
}

impl DuckDbRow {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Snapshot the row the driver cursor is positioned on
    pub fn from_row(row: &duckdb::Row<'_>) -> Result<Self> {
        let names = row.as_ref().column_names();
        let mut columns = Vec::with_capacity(names.len());
        for (idx, name) in names.into_iter().enumerate() {
            let value: Value = row.get(idx)?;
            columns.push((name, value));
        }
        tracing::trace!(columns = columns.len(), "snapshotted DuckDB row");
        Ok(Self { columns })
    }

    /// Append a column
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First value under `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for DuckDbRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
