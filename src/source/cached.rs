//! Memoized type mapping

use super::operations::SourceOperations;
use super::types::UnmappedTypePolicy;
use crate::error::Result;
use crate::schema::JsonType;
use crate::types::JsonObject;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Wraps an adapter and caches `get_type` results per descriptor.
///
/// Row conversion is passed straight through. Only successful mappings are
/// cached; a rejected descriptor is re-evaluated (with the same outcome) on
/// every call. The cache is safe to share between threads.
pub struct CachedSourceOperations<S>
where
    S: SourceOperations,
    S::SourceType: ToOwned,
{
    inner: S,
    cache: RwLock<HashMap<<S::SourceType as ToOwned>::Owned, JsonType>>,
}

impl<S> CachedSourceOperations<S>
where
    S: SourceOperations,
    S::SourceType: ToOwned + Hash + Eq,
    <S::SourceType as ToOwned>::Owned: Hash + Eq,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped adapter
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Number of cached descriptors
    pub fn cached_len(&self) -> usize {
        self.read_cache().len()
    }

    pub fn clear(&self) {
        self.write_cache().clear();
    }

    // Entries are pure functions of their keys; a poisoned map is still valid.
    fn read_cache(
        &self,
    ) -> RwLockReadGuard<'_, HashMap<<S::SourceType as ToOwned>::Owned, JsonType>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(
        &self,
    ) -> RwLockWriteGuard<'_, HashMap<<S::SourceType as ToOwned>::Owned, JsonType>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> SourceOperations for CachedSourceOperations<S>
where
    S: SourceOperations,
    S::SourceType: ToOwned + Hash + Eq,
    <S::SourceType as ToOwned>::Owned: Hash + Eq + Send + Sync,
{
    type QueryResult = S::QueryResult;
    type SourceType = S::SourceType;

    fn row_to_json(&self, row: &Self::QueryResult) -> Result<JsonObject> {
        self.inner.row_to_json(row)
    }

    fn get_type(&self, source_type: &Self::SourceType) -> Result<JsonType> {
        let cached = self.read_cache().get(source_type).copied();
        if let Some(json_type) = cached {
            tracing::trace!(adapter = self.inner.name(), "type cache hit");
            return Ok(json_type);
        }

        tracing::trace!(adapter = self.inner.name(), "type cache miss");
        let json_type = self.inner.get_type(source_type)?;
        self.write_cache().insert(source_type.to_owned(), json_type);
        Ok(json_type)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn unmapped_type_policy(&self) -> UnmappedTypePolicy {
        self.inner.unmapped_type_policy()
    }

    fn format_hint(&self, source_type: &Self::SourceType) -> Option<&'static str> {
        self.inner.format_hint(source_type)
    }
}
