//! Document store source operations
//!
//! Documents arrive as MongoDB Extended JSON (canonical or relaxed). Wrapper
//! objects are unwrapped into plain JSON:
//!
//! | Wrapper | JSON |
//! |---|---|
//! | `$oid` | 24-hex-digit string |
//! | `$date` | UTC `YYYY-MM-DDTHH:MM:SS.mmmZ` |
//! | `$numberInt`, `$numberLong` | integer |
//! | `$numberDouble`, `$numberDecimal` | number (NaN and infinities are rejected) |
//! | `$binary` | base64 string |
//! | `$timestamp` | object `{"t": seconds, "i": increment}` |
//! | `$regularExpression`, `$regex` | `/pattern/options` |
//! | `$symbol`, `$code` | string |
//!
//! `$minKey`, `$maxKey`, `$undefined`, `$dbPointer` and code-with-scope
//! follow the configured [`UnmappedTypePolicy`], which defaults to
//! `FallbackToString` (the wrapper's compact JSON text).

use super::types::BsonType;
use crate::config::DocumentOptions;
use crate::error::{Error, Result};
use crate::schema::JsonType;
use crate::source::{SourceOperations, UnmappedTypePolicy};
use crate::types::{JsonObject, JsonValue};
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};

/// Source operations for document stores speaking Extended JSON
#[derive(Debug, Clone)]
pub struct DocumentSourceOperations {
    policy: UnmappedTypePolicy,
}

impl Default for DocumentSourceOperations {
    fn default() -> Self {
        Self {
            policy: UnmappedTypePolicy::FallbackToString,
        }
    }
}

impl DocumentSourceOperations {
    /// Adapter name used in errors
    pub const NAME: &'static str = "document";

    /// Create an adapter that falls back to string for unmapped types
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnmappedTypePolicy) -> Self {
        Self { policy }
    }

    pub fn from_options(options: &DocumentOptions) -> Self {
        Self::with_policy(options.unmapped_types)
    }

    fn normalize(&self, value: &JsonValue, path: &str) -> Result<JsonValue> {
        match value {
            JsonValue::Array(items) => {
                let mut array = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    array.push(self.normalize(item, &format!("{path}[{idx}]"))?);
                }
                Ok(JsonValue::Array(array))
            }
            JsonValue::Object(object) => match BsonType::of_wrapper(object) {
                Some(bson_type) => self.unwrap_extended(bson_type, object, path),
                None => {
                    let mut normalized = JsonObject::with_capacity(object.len());
                    for (key, field) in object {
                        let converted = self.normalize(field, &format!("{path}.{key}"))?;
                        normalized.insert(key.clone(), converted);
                    }
                    Ok(JsonValue::Object(normalized))
                }
            },
            scalar => Ok(scalar.clone()),
        }
    }

    fn unwrap_extended(
        &self,
        bson_type: BsonType,
        wrapper: &JsonObject,
        path: &str,
    ) -> Result<JsonValue> {
        let malformed = |detail: &str| {
            let raw = JsonValue::Object(wrapper.clone());
            Error::unrepresentable(
                Self::NAME,
                path,
                format!("malformed {bson_type} value {raw}: {detail}"),
            )
        };

        let json = match bson_type {
            BsonType::ObjectId => {
                let oid =
                    str_field(wrapper, "$oid").ok_or_else(|| malformed("expected a string"))?;
                if oid.len() != 24 || !oid.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(malformed("expected 24 hex digits"));
                }
                JsonValue::String(oid.to_string())
            }
            BsonType::Date => {
                let millis = match wrapper.get("$date") {
                    Some(JsonValue::String(s)) => DateTime::parse_from_rfc3339(s)
                        .map_err(|e| malformed(&e.to_string()))?
                        .timestamp_millis(),
                    Some(JsonValue::Number(n)) => {
                        n.as_i64().ok_or_else(|| malformed("expected integer millis"))?
                    }
                    Some(JsonValue::Object(inner)) => str_field(inner, "$numberLong")
                        .and_then(|s| s.parse::<i64>().ok())
                        .ok_or_else(|| malformed("expected $numberLong millis"))?,
                    _ => return Err(malformed("expected a date")),
                };
                let date = DateTime::<Utc>::from_timestamp_millis(millis)
                    .ok_or_else(|| malformed("outside the calendar range"))?;
                JsonValue::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            BsonType::Int => {
                let n = str_field(wrapper, "$numberInt")
                    .and_then(|s| s.parse::<i32>().ok())
                    .ok_or_else(|| malformed("expected a 32-bit integer string"))?;
                JsonValue::from(n)
            }
            BsonType::Long => {
                let n = str_field(wrapper, "$numberLong")
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| malformed("expected a 64-bit integer string"))?;
                JsonValue::from(n)
            }
            BsonType::Double => {
                let f = str_field(wrapper, "$numberDouble")
                    .and_then(|s| s.parse::<f64>().ok())
                    .ok_or_else(|| malformed("expected a double string"))?;
                serde_json::Number::from_f64(f)
                    .map(JsonValue::Number)
                    .ok_or_else(|| malformed("no JSON number form"))?
            }
            BsonType::Decimal => {
                let text = str_field(wrapper, "$numberDecimal")
                    .ok_or_else(|| malformed("expected a decimal string"))?;
                text.parse::<serde_json::Number>()
                    .map(JsonValue::Number)
                    .map_err(|_| malformed("no JSON number form"))?
            }
            BsonType::BinData => {
                let encoded = match wrapper.get("$binary") {
                    Some(JsonValue::String(s)) => s.as_str(),
                    Some(JsonValue::Object(inner)) => str_field(inner, "base64")
                        .ok_or_else(|| malformed("expected a base64 field"))?,
                    _ => return Err(malformed("expected binary data")),
                };
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| malformed(&e.to_string()))?;
                JsonValue::String(encoded.to_string())
            }
            BsonType::Timestamp => {
                let timestamp = wrapper.get("$timestamp");
                let part = |key: &str| {
                    timestamp
                        .and_then(|ts| ts.get(key))
                        .and_then(JsonValue::as_u64)
                        .and_then(|n| u32::try_from(n).ok())
                };
                let seconds = part("t")
                    .ok_or_else(|| malformed("expected a 32-bit seconds field 't'"))?;
                let increment = part("i")
                    .ok_or_else(|| malformed("expected a 32-bit increment field 'i'"))?;
                serde_json::json!({ "t": seconds, "i": increment })
            }
            BsonType::Regex => {
                let (pattern, options) = match wrapper.get("$regularExpression") {
                    Some(JsonValue::Object(inner)) => {
                        (str_field(inner, "pattern"), str_field(inner, "options"))
                    }
                    _ => (str_field(wrapper, "$regex"), str_field(wrapper, "$options")),
                };
                let pattern = pattern.ok_or_else(|| malformed("expected a pattern"))?;
                JsonValue::String(format!("/{pattern}/{}", options.unwrap_or_default()))
            }
            BsonType::Symbol => JsonValue::String(
                str_field(wrapper, "$symbol")
                    .ok_or_else(|| malformed("expected a string"))?
                    .to_string(),
            ),
            BsonType::JavaScript => JsonValue::String(
                str_field(wrapper, "$code")
                    .ok_or_else(|| malformed("expected a string"))?
                    .to_string(),
            ),
            other => return self.unmapped_value(other, wrapper, path),
        };
        Ok(json)
    }

    fn unmapped_value(
        &self,
        bson_type: BsonType,
        wrapper: &JsonObject,
        path: &str,
    ) -> Result<JsonValue> {
        match self.policy {
            UnmappedTypePolicy::FallbackToString => {
                tracing::debug!(
                    adapter = Self::NAME,
                    column = path,
                    "rendering unmapped BSON {bson_type} as opaque string"
                );
                Ok(JsonValue::String(JsonValue::Object(wrapper.clone()).to_string()))
            }
            UnmappedTypePolicy::Reject => Err(Error::unrepresentable(
                Self::NAME,
                path,
                format!("BSON {bson_type} has no JSON representation"),
            )),
        }
    }
}

impl SourceOperations for DocumentSourceOperations {
    type QueryResult = JsonObject;
    type SourceType = str;

    fn row_to_json(&self, document: &JsonObject) -> Result<JsonObject> {
        let mut record = JsonObject::with_capacity(document.len());
        for (field, value) in document {
            let converted = self.normalize(value, field)?;
            record.insert(field.clone(), converted);
        }
        Ok(record)
    }

    fn get_type(&self, source_type: &str) -> Result<JsonType> {
        match BsonType::from_alias(source_type).and_then(|t| t.json_type()) {
            Some(json_type) => Ok(json_type),
            None => self.policy.resolve(Self::NAME, source_type),
        }
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn unmapped_type_policy(&self) -> UnmappedTypePolicy {
        self.policy
    }

    fn format_hint(&self, source_type: &str) -> Option<&'static str> {
        BsonType::from_alias(source_type).and_then(|t| t.format_hint())
    }
}

fn str_field<'a>(object: &'a JsonObject, key: &str) -> Option<&'a str> {
    object.get(key).and_then(JsonValue::as_str)
}
