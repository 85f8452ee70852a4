//! Stream schema assembly from column metadata

use super::types::{JsonSchema, JsonType, SchemaProperty};
use crate::error::{Error, Result};
use crate::source::{ColumnDescriptor, SourceOperations};
use std::borrow::Borrow;

/// Build a stream schema by mapping each column's native type.
///
/// Properties keep column order. NOT NULL columns are listed in `required`,
/// the rest are typed `[t, "null"]`. Fails on the first column whose type
/// cannot be mapped, or on a repeated column name.
pub fn build_schema<S, T>(
    ops: &S,
    columns: &[ColumnDescriptor<T>],
    title: Option<&str>,
) -> Result<JsonSchema>
where
    S: SourceOperations + ?Sized,
    T: Borrow<S::SourceType>,
{
    let mut schema = JsonSchema::new();
    if let Some(title) = title {
        schema = schema.with_title(title);
    }

    for column in columns {
        if schema.has_property(&column.name) {
            return Err(Error::duplicate_column(ops.name(), &column.name));
        }

        let descriptor = column.source_type.borrow();
        let json_type = ops.get_type(descriptor)?;

        let mut property = if column.nullable || json_type == JsonType::Null {
            SchemaProperty::nullable(json_type)
        } else {
            SchemaProperty::new(json_type)
        };
        if let Some(format) = ops.format_hint(descriptor) {
            property = property.with_format(format);
        }

        let nullable = property.is_nullable();
        schema.add_property(&column.name, property);
        if !nullable {
            schema.add_required(&column.name);
        }
    }

    Ok(schema)
}
