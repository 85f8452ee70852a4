//! BSON type descriptors

use crate::schema::JsonType;
use crate::types::JsonObject;

/// BSON type, as named by MongoDB's `$type` aliases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType {
    Double,
    String,
    Object,
    Array,
    BinData,
    Undefined,
    ObjectId,
    Bool,
    Date,
    Null,
    Regex,
    DbPointer,
    JavaScript,
    Symbol,
    JavaScriptWithScope,
    Int,
    Timestamp,
    Long,
    Decimal,
    MinKey,
    MaxKey,
}

impl BsonType {
    /// Parse a `$type` alias (`"objectId"`) or numeric code (`"7"`).
    /// Aliases are matched case-insensitively.
    pub fn from_alias(alias: &str) -> Option<BsonType> {
        let alias = alias.trim();
        if let Ok(code) = alias.parse::<i32>() {
            return Self::from_code(code);
        }

        const ALIASES: [(&str, BsonType); 21] = [
            ("double", BsonType::Double),
            ("string", BsonType::String),
            ("object", BsonType::Object),
            ("array", BsonType::Array),
            ("binData", BsonType::BinData),
            ("undefined", BsonType::Undefined),
            ("objectId", BsonType::ObjectId),
            ("bool", BsonType::Bool),
            ("date", BsonType::Date),
            ("null", BsonType::Null),
            ("regex", BsonType::Regex),
            ("dbPointer", BsonType::DbPointer),
            ("javascript", BsonType::JavaScript),
            ("symbol", BsonType::Symbol),
            ("javascriptWithScope", BsonType::JavaScriptWithScope),
            ("int", BsonType::Int),
            ("timestamp", BsonType::Timestamp),
            ("long", BsonType::Long),
            ("decimal", BsonType::Decimal),
            ("minKey", BsonType::MinKey),
            ("maxKey", BsonType::MaxKey),
        ];
        ALIASES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(alias))
            .map(|(_, t)| *t)
    }

    /// BSON element type byte
    pub fn from_code(code: i32) -> Option<BsonType> {
        let t = match code {
            1 => BsonType::Double,
            2 => BsonType::String,
            3 => BsonType::Object,
            4 => BsonType::Array,
            5 => BsonType::BinData,
            6 => BsonType::Undefined,
            7 => BsonType::ObjectId,
            8 => BsonType::Bool,
            9 => BsonType::Date,
            10 => BsonType::Null,
            11 => BsonType::Regex,
            12 => BsonType::DbPointer,
            13 => BsonType::JavaScript,
            14 => BsonType::Symbol,
            15 => BsonType::JavaScriptWithScope,
            16 => BsonType::Int,
            17 => BsonType::Timestamp,
            18 => BsonType::Long,
            19 => BsonType::Decimal,
            -1 => BsonType::MinKey,
            127 => BsonType::MaxKey,
            _ => return None,
        };
        Some(t)
    }

    /// Primitive tag, or `None` for types without a JSON mapping
    pub fn json_type(&self) -> Option<JsonType> {
        let t = match self {
            BsonType::Double | BsonType::Decimal => JsonType::Number,
            BsonType::Int | BsonType::Long => JsonType::Integer,
            BsonType::String
            | BsonType::ObjectId
            | BsonType::BinData
            | BsonType::Date
            | BsonType::Regex
            | BsonType::JavaScript
            | BsonType::Symbol => JsonType::String,
            BsonType::Object | BsonType::Timestamp => JsonType::Object,
            BsonType::Array => JsonType::Array,
            BsonType::Bool => JsonType::Boolean,
            BsonType::Null => JsonType::Null,
            BsonType::Undefined
            | BsonType::DbPointer
            | BsonType::JavaScriptWithScope
            | BsonType::MinKey
            | BsonType::MaxKey => return None,
        };
        Some(t)
    }

    pub fn format_hint(&self) -> Option<&'static str> {
        match self {
            BsonType::Date => Some("date-time"),
            _ => None,
        }
    }

    /// BSON type of an Extended JSON wrapper object, e.g. `{"$oid": "..."}`.
    ///
    /// Objects whose keys do not form a known wrapper are plain documents.
    pub fn of_wrapper(object: &JsonObject) -> Option<BsonType> {
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        if !keys.first().is_some_and(|k| k.starts_with('$')) {
            return None;
        }
        keys.sort_unstable();

        let t = match keys.as_slice() {
            ["$oid"] => BsonType::ObjectId,
            ["$date"] => BsonType::Date,
            ["$numberInt"] => BsonType::Int,
            ["$numberLong"] => BsonType::Long,
            ["$numberDouble"] => BsonType::Double,
            ["$numberDecimal"] => BsonType::Decimal,
            ["$binary"] | ["$binary", "$type"] => BsonType::BinData,
            ["$timestamp"] => BsonType::Timestamp,
            ["$regularExpression"] | ["$options", "$regex"] => BsonType::Regex,
            ["$symbol"] => BsonType::Symbol,
            ["$code"] => BsonType::JavaScript,
            ["$code", "$scope"] => BsonType::JavaScriptWithScope,
            ["$dbPointer"] => BsonType::DbPointer,
            ["$minKey"] => BsonType::MinKey,
            ["$maxKey"] => BsonType::MaxKey,
            ["$undefined"] => BsonType::Undefined,
            _ => return None,
        };
        Some(t)
    }
}

impl std::fmt::Display for BsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alias = match self {
            BsonType::Double => "double",
            BsonType::String => "string",
            BsonType::Object => "object",
            BsonType::Array => "array",
            BsonType::BinData => "binData",
            BsonType::Undefined => "undefined",
            BsonType::ObjectId => "objectId",
            BsonType::Bool => "bool",
            BsonType::Date => "date",
            BsonType::Null => "null",
            BsonType::Regex => "regex",
            BsonType::DbPointer => "dbPointer",
            BsonType::JavaScript => "javascript",
            BsonType::Symbol => "symbol",
            BsonType::JavaScriptWithScope => "javascriptWithScope",
            BsonType::Int => "int",
            BsonType::Timestamp => "timestamp",
            BsonType::Long => "long",
            BsonType::Decimal => "decimal",
            BsonType::MinKey => "minKey",
            BsonType::MaxKey => "maxKey",
        };
        f.write_str(alias)
    }
}
