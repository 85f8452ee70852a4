//! Integration tests for the source operations contract
//!
//! Drives both built-in adapters through the same generic extraction flow:
//! column metadata → stream schema, rows → normalized records.

use duckdb::Connection;
use pretty_assertions::assert_eq;
use serde_json::json;
use solidafy_source_ops::config::load_config_from_str;
use solidafy_source_ops::database::{DuckDbRow, DuckDbSourceOperations};
use solidafy_source_ops::document::DocumentSourceOperations;
use solidafy_source_ops::{
    build_schema, CachedSourceOperations, ColumnDescriptor, Error, JsonObject, JsonSchema,
    JsonType, JsonValue, Result, SourceOperations, UnmappedTypePolicy,
};
use std::collections::BTreeSet;

/// Build the stream schema, convert every row, and check each value against
/// its declared column type.
fn extract<'a, S>(
    ops: &S,
    columns: &[ColumnDescriptor<String>],
    rows: impl IntoIterator<Item = &'a S::QueryResult>,
) -> Result<(JsonSchema, Vec<JsonObject>)>
where
    S: SourceOperations<SourceType = str> + ?Sized,
    S::QueryResult: 'a,
{
    let schema = build_schema(ops, columns, Some("stream"))?;

    let mut records = Vec::new();
    for row in rows {
        let record = ops.row_to_json(row)?;
        for (column, value) in &record {
            if let Some(property) = schema.get_property(column) {
                let declared = property.json_type.primary_type();
                assert!(
                    declared.admits(value),
                    "{column}: {declared} does not admit {value}"
                );
            }
        }
        records.push(record);
    }
    Ok((schema, records))
}

fn fetch(sql: &str) -> (Vec<ColumnDescriptor<String>>, Vec<DuckDbRow>) {
    let conn = Connection::open_in_memory().unwrap();

    let mut describe = conn.prepare(&format!("DESCRIBE {sql}")).unwrap();
    let mut described = describe.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = described.next().unwrap() {
        let name: String = row.get(0).unwrap();
        let data_type: String = row.get(1).unwrap();
        columns.push(ColumnDescriptor::new(name, data_type));
    }

    let mut stmt = conn.prepare(sql).unwrap();
    let mut result = stmt.query([]).unwrap();
    let mut rows = Vec::new();
    while let Some(row) = result.next().unwrap() {
        rows.push(DuckDbRow::from_row(row).unwrap());
    }
    (columns, rows)
}

fn document(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(object) => object,
        other => panic!("expected an object, got {other}"),
    }
}

fn key_set(record: &JsonObject) -> BTreeSet<&str> {
    record.keys().map(String::as_str).collect()
}

// ============================================================================
// DuckDB Tests
// ============================================================================

#[test]
fn test_duckdb_round_trip() {
    let (columns, rows) = fetch("SELECT 1::INTEGER AS id, 'ada' AS name, true AS active");
    let ops = DuckDbSourceOperations::new();

    let (schema, records) = extract(&ops, &columns, &rows).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        JsonValue::Object(records[0].clone()),
        json!({"id": 1, "name": "ada", "active": true})
    );

    let types: Vec<JsonType> = schema
        .property_names()
        .iter()
        .map(|name| schema.get_property(name).unwrap().json_type.primary_type())
        .collect();
    assert_eq!(
        types,
        vec![JsonType::Integer, JsonType::String, JsonType::Boolean]
    );
}

#[test]
fn test_duckdb_null_kept_under_key() {
    let (columns, rows) = fetch(
        "SELECT * FROM (VALUES (1, 'ada'), (2, NULL)) AS people(id, name) ORDER BY id",
    );
    let ops = DuckDbSourceOperations::new();

    let (_, records) = extract(&ops, &columns, &rows).unwrap();

    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(key_set(record), BTreeSet::from(["id", "name"]));
    }
    assert_eq!(records[1]["name"], JsonValue::Null);
}

#[test]
fn test_duckdb_key_set_matches_columns() {
    let sql = "SELECT 1 AS a, 2.5::DOUBLE AS b, [1, 2] AS c, {'x': 1} AS d, DATE '2024-01-15' AS e";
    let (columns, rows) = fetch(sql);
    let ops = DuckDbSourceOperations::new();

    let (schema, records) = extract(&ops, &columns, &rows).unwrap();

    let expected: BTreeSet<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(key_set(&records[0]), expected);
    assert_eq!(schema.property_names(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(
        schema.get_property("e").unwrap().format.as_deref(),
        Some("date")
    );
}

#[test]
fn test_duckdb_unsupported_type_rejected() {
    let columns = vec![
        ColumnDescriptor::new("id".to_string(), "INTEGER".to_string()),
        ColumnDescriptor::new("shape".to_string(), "GEOMETRY".to_string()),
    ];
    let ops = DuckDbSourceOperations::new();

    let err = extract(&ops, &columns, &Vec::<DuckDbRow>::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedType { ref descriptor, .. } if descriptor == "GEOMETRY"
    ));
    assert!(err.to_string().contains("GEOMETRY"));
}

#[test]
fn test_duckdb_through_cache_and_trait_object() {
    let (columns, rows) = fetch("SELECT 42::BIGINT AS n, 'x' AS s");

    let cached = CachedSourceOperations::new(DuckDbSourceOperations::new());
    let (first, _) = extract(&cached, &columns, &rows).unwrap();
    let (second, _) = extract(&cached, &columns, &rows).unwrap();
    assert_eq!(first, second);
    assert_eq!(cached.cached_len(), 2);

    let dynamic: &dyn SourceOperations<QueryResult = DuckDbRow, SourceType = str> = &cached;
    let (_, records) = extract(dynamic, &columns, &rows).unwrap();
    assert_eq!(JsonValue::Object(records[0].clone()), json!({"n": 42, "s": "x"}));
}

#[test]
fn test_duckdb_shared_across_threads() {
    let (_, rows) = fetch("SELECT i AS n, i::VARCHAR AS label FROM range(20) t(i)");
    let ops = DuckDbSourceOperations::new();
    let expected: Vec<JsonObject> = rows.iter().map(|r| ops.row_to_json(r).unwrap()).collect();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let converted: Vec<JsonObject> =
                    rows.iter().map(|r| ops.row_to_json(r).unwrap()).collect();
                assert_eq!(converted, expected);
                assert_eq!(ops.get_type("BIGINT").unwrap(), JsonType::Integer);
            });
        }
    });
}

// ============================================================================
// Document Tests
// ============================================================================

#[test]
fn test_document_extraction() {
    let columns = vec![
        ColumnDescriptor::not_null("_id".to_string(), "objectId".to_string()),
        ColumnDescriptor::new("name".to_string(), "string".to_string()),
        ColumnDescriptor::new("age".to_string(), "int".to_string()),
        ColumnDescriptor::new("joined".to_string(), "date".to_string()),
    ];
    let docs = vec![
        document(json!({
            "_id": {"$oid": "507f1f77bcf86cd799439011"},
            "name": "ada",
            "age": {"$numberInt": "36"},
            "joined": {"$date": "2024-01-15T10:30:00Z"}
        })),
        document(json!({
            "_id": {"$oid": "507f1f77bcf86cd799439012"},
            "name": null,
            "age": 41
        })),
    ];
    let ops = DocumentSourceOperations::new();

    let (schema, records) = extract(&ops, &columns, &docs).unwrap();

    assert_eq!(schema.required, vec!["_id".to_string()]);
    assert_eq!(
        schema.to_json()["properties"]["joined"],
        json!({"type": ["string", "null"], "format": "date-time"})
    );
    assert_eq!(
        JsonValue::Object(records[0].clone()),
        json!({
            "_id": "507f1f77bcf86cd799439011",
            "name": "ada",
            "age": 36,
            "joined": "2024-01-15T10:30:00.000Z"
        })
    );
    assert_eq!(key_set(&records[1]), key_set(&docs[1]));
    assert_eq!(records[1]["name"], JsonValue::Null);
}

#[test]
fn test_document_unmapped_type_falls_back() {
    let columns = vec![ColumnDescriptor::new(
        "bound".to_string(),
        "minKey".to_string(),
    )];
    let docs = vec![document(json!({"bound": {"$minKey": 1}}))];
    let ops = DocumentSourceOperations::new();

    let (schema, records) = extract(&ops, &columns, &docs).unwrap();
    assert_eq!(
        schema.get_property("bound").unwrap().json_type.primary_type(),
        JsonType::String
    );
    assert_eq!(records[0]["bound"], json!(r#"{"$minKey":1}"#));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_config_drives_policies() {
    let config = load_config_from_str(
        r"
kind: source_ops
duckdb:
  unmapped_types: fallback_to_string
document:
  unmapped_types: reject
",
    )
    .unwrap();

    let database_ops = DuckDbSourceOperations::from_options(&config.duckdb);
    let document_ops = DocumentSourceOperations::from_options(&config.document);

    assert_eq!(
        database_ops.unmapped_type_policy(),
        UnmappedTypePolicy::FallbackToString
    );
    assert_eq!(database_ops.get_type("GEOMETRY").unwrap(), JsonType::String);

    assert_eq!(document_ops.unmapped_type_policy(), UnmappedTypePolicy::Reject);
    assert!(document_ops.get_type("minKey").unwrap_err().is_unsupported_type());
}
