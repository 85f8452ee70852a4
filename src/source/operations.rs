//! The row conversion and type mapping contract

use super::types::UnmappedTypePolicy;
use crate::error::Result;
use crate::schema::JsonType;
use crate::types::JsonObject;

/// Operations every source adapter provides to the extraction pipeline.
///
/// An adapter binds `QueryResult` to its driver's row representation and
/// `SourceType` to its column type metadata. The pipeline only ever talks to
/// this trait, so adapters stay independent of each other.
///
/// Both operations borrow their input for the duration of one call and must
/// not mutate shared state: calls may run concurrently on the same instance.
pub trait SourceOperations: Send + Sync {
    /// One fetched row, as produced by the source driver
    type QueryResult: ?Sized;

    /// One column type descriptor, as produced by schema introspection
    type SourceType: ?Sized;

    /// Convert one row into a normalized record.
    ///
    /// Every column of `row` appears exactly once in the result, in the row's
    /// column order. A value with no normalized form is an error naming the
    /// column; it is never dropped.
    fn row_to_json(&self, row: &Self::QueryResult) -> Result<JsonObject>;

    /// Map one column type descriptor to its primitive type tag.
    ///
    /// Deterministic. Descriptors outside the supported set resolve through
    /// [`unmapped_type_policy`](Self::unmapped_type_policy).
    fn get_type(&self, source_type: &Self::SourceType) -> Result<JsonType>;

    /// Adapter name used to attribute errors
    fn name(&self) -> &str {
        "source"
    }

    /// What `get_type` does with descriptors it has no mapping for
    fn unmapped_type_policy(&self) -> UnmappedTypePolicy {
        UnmappedTypePolicy::Reject
    }

    /// JSON-schema `format` for a descriptor (e.g. `date-time`)
    fn format_hint(&self, _source_type: &Self::SourceType) -> Option<&'static str> {
        None
    }
}
