//! DuckDB column type descriptors
//!
//! DuckDB reports column types as text (`DESCRIBE`, `information_schema`).
//! Types of attached PostgreSQL, MySQL and SQLite tables arrive already
//! translated into DuckDB's type names.

use crate::schema::JsonType;
use once_cell::sync::Lazy;
use regex::Regex;

/// `DECIMAL(p)` / `DECIMAL(p, s)` arguments
static DECIMAL_ARGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2})\s*(?:,\s*(\d{1,2})\s*)?$").expect("valid decimal pattern")
});

/// Widest DECIMAL DuckDB supports
const MAX_DECIMAL_PRECISION: u8 = 38;

/// A parsed DuckDB logical type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuckDbType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    HugeInt,
    UTinyInt,
    USmallInt,
    UInteger,
    UBigInt,
    UHugeInt,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Varchar,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampS,
    TimestampMs,
    TimestampNs,
    TimestampTz,
    Interval,
    Uuid,
    Json,
    Enum(Vec<String>),
    List(Box<DuckDbType>),
    Array(Box<DuckDbType>, usize),
    Struct(Vec<(String, DuckDbType)>),
    Map(Box<DuckDbType>, Box<DuckDbType>),
}

impl DuckDbType {
    /// Parse a type name as DuckDB prints it.
    ///
    /// Case-insensitive; common aliases are accepted. Returns `None` for
    /// types without a mapping (UNION, TIMETZ, BIT, extension types such as
    /// GEOMETRY, or anything unrecognized, including nested types containing
    /// one).
    pub fn parse(descriptor: &str) -> Option<DuckDbType> {
        let s = descriptor.trim();
        if s.is_empty() {
            return None;
        }

        if let Some(element) = s.strip_suffix("[]") {
            return Some(DuckDbType::List(Box::new(Self::parse(element)?)));
        }
        if let Some(head) = s.strip_suffix(']') {
            let open = head.rfind('[')?;
            let size = head[open + 1..].trim().parse::<usize>().ok()?;
            return Some(DuckDbType::Array(Box::new(Self::parse(&head[..open])?), size));
        }

        if let Some(open) = s.find('(') {
            let args = s[open + 1..].strip_suffix(')')?;
            let name = s[..open].trim().to_ascii_uppercase();
            return Self::parse_parameterized(&name, args);
        }

        let name = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        Self::parse_simple(&name)
    }

    fn parse_simple(name: &str) -> Option<DuckDbType> {
        let parsed = match name {
            "BOOLEAN" | "BOOL" | "LOGICAL" => DuckDbType::Boolean,
            "TINYINT" | "INT1" => DuckDbType::TinyInt,
            "SMALLINT" | "INT2" | "SHORT" => DuckDbType::SmallInt,
            "INTEGER" | "INT" | "INT4" | "SIGNED" => DuckDbType::Integer,
            "BIGINT" | "INT8" | "LONG" => DuckDbType::BigInt,
            "HUGEINT" | "INT128" => DuckDbType::HugeInt,
            "UTINYINT" => DuckDbType::UTinyInt,
            "USMALLINT" => DuckDbType::USmallInt,
            "UINTEGER" => DuckDbType::UInteger,
            "UBIGINT" => DuckDbType::UBigInt,
            "UHUGEINT" => DuckDbType::UHugeInt,
            "FLOAT" | "FLOAT4" | "REAL" => DuckDbType::Float,
            "DOUBLE" | "FLOAT8" | "DOUBLE PRECISION" => DuckDbType::Double,
            // DuckDB's default DECIMAL width
            "DECIMAL" | "NUMERIC" => DuckDbType::Decimal {
                precision: 18,
                scale: 3,
            },
            "VARCHAR" | "CHAR" | "BPCHAR" | "TEXT" | "STRING" | "NVARCHAR" => DuckDbType::Varchar,
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" => DuckDbType::Blob,
            "DATE" => DuckDbType::Date,
            "TIME" | "TIME WITHOUT TIME ZONE" => DuckDbType::Time,
            "TIMESTAMP" | "DATETIME" | "TIMESTAMP WITHOUT TIME ZONE" | "TIMESTAMP_US" => {
                DuckDbType::Timestamp
            }
            "TIMESTAMP_S" => DuckDbType::TimestampS,
            "TIMESTAMP_MS" => DuckDbType::TimestampMs,
            "TIMESTAMP_NS" => DuckDbType::TimestampNs,
            "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" => DuckDbType::TimestampTz,
            "INTERVAL" => DuckDbType::Interval,
            "UUID" => DuckDbType::Uuid,
            "JSON" => DuckDbType::Json,
            // Values arrive without their offset (TIMETZ) or in padded
            // storage form (BIT)
            "TIMETZ" | "TIME WITH TIME ZONE" | "BIT" | "BITSTRING" => return None,
            _ => return None,
        };
        Some(parsed)
    }

    fn parse_parameterized(name: &str, args: &str) -> Option<DuckDbType> {
        match name {
            "DECIMAL" | "NUMERIC" => {
                let caps = DECIMAL_ARGS.captures(args)?;
                let precision: u8 = caps[1].parse().ok()?;
                let scale: u8 = match caps.get(2) {
                    Some(m) => m.as_str().parse().ok()?,
                    None => 0,
                };
                if precision == 0 || precision > MAX_DECIMAL_PRECISION || scale > precision {
                    return None;
                }
                Some(DuckDbType::Decimal { precision, scale })
            }
            // Length modifiers carry no meaning for the type tag
            "VARCHAR" | "CHAR" | "BPCHAR" | "TEXT" | "STRING" | "NVARCHAR" => {
                Some(DuckDbType::Varchar)
            }
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" => Some(DuckDbType::Blob),
            "ENUM" => {
                let labels = split_top_level(args)
                    .into_iter()
                    .map(|label| unquote(label, '\''))
                    .collect::<Option<Vec<_>>>()?;
                Some(DuckDbType::Enum(labels))
            }
            "STRUCT" | "ROW" => {
                let fields = split_top_level(args)
                    .into_iter()
                    .map(parse_struct_field)
                    .collect::<Option<Vec<_>>>()?;
                if fields.is_empty() {
                    return None;
                }
                Some(DuckDbType::Struct(fields))
            }
            "MAP" => {
                let parts = split_top_level(args);
                let [key, value] = parts.as_slice() else {
                    return None;
                };
                Some(DuckDbType::Map(
                    Box::new(Self::parse(key)?),
                    Box::new(Self::parse(value)?),
                ))
            }
            _ => None,
        }
    }

    /// Primitive type tag for this type
    pub fn json_type(&self) -> JsonType {
        match self {
            DuckDbType::Boolean => JsonType::Boolean,
            DuckDbType::TinyInt
            | DuckDbType::SmallInt
            | DuckDbType::Integer
            | DuckDbType::BigInt
            | DuckDbType::HugeInt
            | DuckDbType::UTinyInt
            | DuckDbType::USmallInt
            | DuckDbType::UInteger
            | DuckDbType::UBigInt
            | DuckDbType::UHugeInt => JsonType::Integer,
            DuckDbType::Float | DuckDbType::Double | DuckDbType::Decimal { .. } => {
                JsonType::Number
            }
            DuckDbType::Varchar
            | DuckDbType::Blob
            | DuckDbType::Date
            | DuckDbType::Time
            | DuckDbType::Timestamp
            | DuckDbType::TimestampS
            | DuckDbType::TimestampMs
            | DuckDbType::TimestampNs
            | DuckDbType::TimestampTz
            | DuckDbType::Interval
            | DuckDbType::Uuid
            | DuckDbType::Json
            | DuckDbType::Enum(_) => JsonType::String,
            DuckDbType::List(_) | DuckDbType::Array(..) => JsonType::Array,
            DuckDbType::Struct(_) | DuckDbType::Map(..) => JsonType::Object,
        }
    }

    /// JSON-schema `format` for temporal and UUID types
    pub fn format_hint(&self) -> Option<&'static str> {
        match self {
            DuckDbType::Date => Some("date"),
            DuckDbType::Time => Some("time"),
            DuckDbType::Timestamp
            | DuckDbType::TimestampS
            | DuckDbType::TimestampMs
            | DuckDbType::TimestampNs
            | DuckDbType::TimestampTz => Some("date-time"),
            DuckDbType::Uuid => Some("uuid"),
            _ => None,
        }
    }
}

/// Split on commas outside parentheses, brackets and quotes
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in args.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(args[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }

    let last = args[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

/// `name TYPE` or `"quoted name" TYPE`
fn parse_struct_field(field: &str) -> Option<(String, DuckDbType)> {
    let field = field.trim();
    let (name, rest) = if field.starts_with('"') {
        let close = field[1..].find('"')? + 1;
        (field[1..close].to_string(), &field[close + 1..])
    } else {
        let split = field.find(char::is_whitespace)?;
        (field[..split].to_string(), &field[split..])
    };
    Some((name, DuckDbType::parse(rest)?))
}

fn unquote(s: &str, quote: char) -> Option<String> {
    s.trim()
        .strip_prefix(quote)
        .and_then(|s| s.strip_suffix(quote))
        .map(str::to_string)
}
