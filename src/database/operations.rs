//! DuckDB source operations
//!
//! Converts DuckDB rows into normalized records and DuckDB type names into
//! primitive type tags.
//!
//! # Value representation
//!
//! | DuckDB value | JSON |
//! |---|---|
//! | integers (incl. HUGEINT within 64 bits) | integer |
//! | FLOAT, DOUBLE | number (NaN and infinities are rejected) |
//! | DECIMAL | number parsed from the decimal's text (f64 precision, rounding is logged) |
//! | VARCHAR, ENUM | string |
//! | BLOB | standard base64 string |
//! | DATE | `YYYY-MM-DD` |
//! | TIME | `HH:MM:SS.ffffff` (`24:00:00.000000` for the end of day) |
//! | TIMESTAMP | UTC `YYYY-MM-DDTHH:MM:SS.ffffffZ` (9 digits for ns values) |
//! | INTERVAL | ISO-8601 duration `P{months}M{days}DT{seconds}S` |
//! | LIST, ARRAY | array |
//! | STRUCT | object |
//! | MAP | object with stringified keys |
//!
//! Types with no mapping (UNION, TIMETZ, BIT, extension types) follow the
//! configured [`UnmappedTypePolicy`], which defaults to `Reject`. TIMETZ and BIT
//! values reach the driver as plain TIME and BLOB values, so only the declared
//! column type can tell them apart; a pipeline maps column types before it
//! converts rows.

use super::row::DuckDbRow;
use super::types::DuckDbType;
use crate::config::DuckDbOptions;
use crate::error::{Error, Result};
use crate::schema::JsonType;
use crate::source::{SourceOperations, UnmappedTypePolicy};
use crate::types::{JsonObject, JsonValue};
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, Value};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const NANOS_PER_SEC: i64 = 1_000_000_000;

const SECS_PER_DAY: i64 = 86_400;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const TIMESTAMP_FORMAT_NS: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";
const TIME_FORMAT: &str = "%H:%M:%S%.6f";
const TIME_FORMAT_NS: &str = "%H:%M:%S%.9f";

/// Source operations for DuckDB and the databases it attaches
#[derive(Debug, Clone, Default)]
pub struct DuckDbSourceOperations {
    policy: UnmappedTypePolicy,
}

impl DuckDbSourceOperations {
    /// Adapter name used in errors
    pub const NAME: &'static str = "duckdb";

    /// Create an adapter that rejects unmapped types
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnmappedTypePolicy) -> Self {
        Self { policy }
    }

    pub fn from_options(options: &DuckDbOptions) -> Self {
        Self::with_policy(options.unmapped_types)
    }

    fn value_to_json(&self, value: &Value, path: &str) -> Result<JsonValue> {
        let json = match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::TinyInt(i) => JsonValue::from(*i),
            Value::SmallInt(i) => JsonValue::from(*i),
            Value::Int(i) => JsonValue::from(*i),
            Value::BigInt(i) => JsonValue::from(*i),
            Value::HugeInt(i) => hugeint_to_json(*i).ok_or_else(|| {
                Error::unrepresentable(
                    Self::NAME,
                    path,
                    format!("HUGEINT {i} does not fit in a 64-bit integer"),
                )
            })?,
            Value::UTinyInt(i) => JsonValue::from(*i),
            Value::USmallInt(i) => JsonValue::from(*i),
            Value::UInt(i) => JsonValue::from(*i),
            Value::UBigInt(i) => JsonValue::from(*i),
            Value::Float(f) => float_to_json(f64::from(*f), path)?,
            Value::Double(f) => float_to_json(*f, path)?,
            Value::Decimal(d) => decimal_to_json(&d.to_string(), path)?,
            Value::Text(s) | Value::Enum(s) => JsonValue::String(s.clone()),
            Value::Blob(b) => {
                JsonValue::String(base64::engine::general_purpose::STANDARD.encode(b))
            }
            Value::Timestamp(unit, t) => {
                JsonValue::String(format_timestamp(*unit, *t).ok_or_else(|| {
                    Error::unrepresentable(
                        Self::NAME,
                        path,
                        format!("TIMESTAMP {t} ({unit:?}) is outside the calendar range"),
                    )
                })?)
            }
            Value::Date32(d) => JsonValue::String(format_date(*d).ok_or_else(|| {
                Error::unrepresentable(
                    Self::NAME,
                    path,
                    format!("DATE {d} is outside the calendar range"),
                )
            })?),
            Value::Time64(unit, t) => JsonValue::String(format_time(*unit, *t).ok_or_else(|| {
                Error::unrepresentable(
                    Self::NAME,
                    path,
                    format!("TIME {t} ({unit:?}) is not a time of day"),
                )
            })?),
            Value::Interval {
                months,
                days,
                nanos,
            } => JsonValue::String(format_interval(*months, *days, *nanos)),
            Value::List(items) | Value::Array(items) => {
                let mut array = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    array.push(self.value_to_json(item, &format!("{path}[{idx}]"))?);
                }
                JsonValue::Array(array)
            }
            Value::Struct(fields) => {
                let mut object = JsonObject::new();
                for (name, field) in fields.iter() {
                    let field_path = format!("{path}.{name}");
                    if object.contains_key(name.as_str()) {
                        return Err(Error::duplicate_column(Self::NAME, field_path));
                    }
                    let converted = self.value_to_json(field, &field_path)?;
                    object.insert(name.clone(), converted);
                }
                JsonValue::Object(object)
            }
            Value::Map(entries) => {
                let mut object = JsonObject::new();
                for (key, entry) in entries.iter() {
                    let key = self.map_key(key, path)?;
                    let entry_path = format!("{path}.{key}");
                    if object.contains_key(&key) {
                        return Err(Error::duplicate_column(Self::NAME, entry_path));
                    }
                    let converted = self.value_to_json(entry, &entry_path)?;
                    object.insert(key, converted);
                }
                JsonValue::Object(object)
            }
            _ => self.unmapped_value(value, path)?,
        };
        Ok(json)
    }

    /// MAP keys become object keys: strings verbatim, scalars as JSON text
    fn map_key(&self, key: &Value, path: &str) -> Result<String> {
        match self.value_to_json(key, path)? {
            JsonValue::String(s) => Ok(s),
            JsonValue::Null => Err(Error::unrepresentable(
                Self::NAME,
                path,
                "MAP contains a NULL key",
            )),
            JsonValue::Array(_) | JsonValue::Object(_) => Err(Error::unrepresentable(
                Self::NAME,
                path,
                "MAP keys must be scalar",
            )),
            other => Ok(other.to_string()),
        }
    }

    fn unmapped_value(&self, value: &Value, path: &str) -> Result<JsonValue> {
        match self.policy {
            UnmappedTypePolicy::FallbackToString => {
                tracing::debug!(
                    adapter = Self::NAME,
                    column = path,
                    "rendering unmapped DuckDB value as opaque string"
                );
                Ok(JsonValue::String(format!("{value:?}")))
            }
            UnmappedTypePolicy::Reject => Err(Error::unrepresentable(
                Self::NAME,
                path,
                format!("no JSON representation for DuckDB value {value:?}"),
            )),
        }
    }
}

impl SourceOperations for DuckDbSourceOperations {
    type QueryResult = DuckDbRow;
    type SourceType = str;

    fn row_to_json(&self, row: &DuckDbRow) -> Result<JsonObject> {
        let mut record = JsonObject::with_capacity(row.len());
        for (column, value) in row.iter() {
            if record.contains_key(column) {
                return Err(Error::duplicate_column(Self::NAME, column));
            }
            let converted = self.value_to_json(value, column)?;
            record.insert(column.to_string(), converted);
        }
        Ok(record)
    }

    fn get_type(&self, source_type: &str) -> Result<JsonType> {
        match DuckDbType::parse(source_type) {
            Some(parsed) => Ok(parsed.json_type()),
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
        DuckDbType::parse(source_type).and_then(|parsed| parsed.format_hint())
    }
}

// ============================================================================
// Value formatting
// ============================================================================

fn hugeint_to_json(value: i128) -> Option<JsonValue> {
    if let Ok(v) = i64::try_from(value) {
        return Some(JsonValue::from(v));
    }
    u64::try_from(value).ok().map(JsonValue::from)
}

fn decimal_to_json(text: &str, path: &str) -> Result<JsonValue> {
    let number = text.parse::<serde_json::Number>().map_err(|e| {
        Error::unrepresentable(
            DuckDbSourceOperations::NAME,
            path,
            format!("DECIMAL {text} is not a JSON number: {e}"),
        )
    })?;
    if let Some(f) = number.as_f64() {
        if number.is_f64() && !decimal_is_exact(text, f) {
            tracing::debug!(
                adapter = DuckDbSourceOperations::NAME,
                column = path,
                decimal = text,
                "DECIMAL rounded to nearest double"
            );
        }
    }
    Ok(JsonValue::Number(number))
}

/// Whether `value` printed at the decimal's scale reproduces `text`
pub(super) fn decimal_is_exact(text: &str, value: f64) -> bool {
    let scale = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    format!("{value:.scale$}") == text
}

fn float_to_json(value: f64, path: &str) -> Result<JsonValue> {
    serde_json::Number::from_f64(value)
        .map(JsonValue::Number)
        .ok_or_else(|| {
            Error::unrepresentable(
                DuckDbSourceOperations::NAME,
                path,
                format!("{value} has no JSON number form"),
            )
        })
}

/// Split a count of `unit` into whole seconds and nanoseconds
fn split_seconds(unit: TimeUnit, value: i64) -> (i64, u32) {
    let per_sec = match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => NANOS_PER_SEC,
    };
    let secs = value.div_euclid(per_sec);
    let nanos = value.rem_euclid(per_sec) * (NANOS_PER_SEC / per_sec);
    (secs, nanos as u32)
}

fn format_timestamp(unit: TimeUnit, value: i64) -> Option<String> {
    let (secs, nanos) = split_seconds(unit, value);
    let format = match unit {
        TimeUnit::Nanosecond => TIMESTAMP_FORMAT_NS,
        _ => TIMESTAMP_FORMAT,
    };
    DateTime::from_timestamp(secs, nanos).map(|dt| dt.format(format).to_string())
}

fn format_date(days_since_epoch: i32) -> Option<String> {
    let days_from_ce = days_since_epoch.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?;
    NaiveDate::from_num_days_from_ce_opt(days_from_ce).map(|d| d.format("%Y-%m-%d").to_string())
}

fn format_time(unit: TimeUnit, value: i64) -> Option<String> {
    let (secs, nanos) = split_seconds(unit, value);
    // DuckDB admits 24:00:00 as the end of a day
    if secs == SECS_PER_DAY && nanos == 0 {
        let end_of_day = match unit {
            TimeUnit::Nanosecond => "24:00:00.000000000",
            _ => "24:00:00.000000",
        };
        return Some(end_of_day.to_string());
    }

    let secs = u32::try_from(secs).ok()?;
    let format = match unit {
        TimeUnit::Nanosecond => TIME_FORMAT_NS,
        _ => TIME_FORMAT,
    };
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
        .map(|t| t.format(format).to_string())
}

fn format_interval(months: i32, days: i32, nanos: i64) -> String {
    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();
    let whole = abs / NANOS_PER_SEC as u64;
    let frac = abs % NANOS_PER_SEC as u64;

    let seconds = if frac == 0 {
        format!("{sign}{whole}")
    } else {
        let digits = format!("{frac:09}");
        format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
    };
    format!("P{months}M{days}DT{seconds}S")
}
