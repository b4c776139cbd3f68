//! Built-in ClickHouse type entries.
//!
//! Patterns anchor on the outer type constructor so that a well-formed type
//! name is claimed by at most one pattern; the payload inside the parentheses
//! is never inspected.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TypeEntry;
use crate::convert::Converter;
use crate::core::{FieldType, ScanKind, ScanShape};

/// Scalar families, tried before composite wrappers.
const SCALAR_PRIORITY: u8 = 10;
const COMPOSITE_PRIORITY: u8 = 20;

// Date, Date32, DateTime, DateTime('tz'), DateTime64(p[, 'tz'])
static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Date").unwrap());
static RE_NULLABLE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Nullable\(Date").unwrap());
static RE_DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Decimal").unwrap());
static RE_NULLABLE_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Nullable\(Decimal").unwrap());
static RE_LC_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^LowCardinality\(String\)$").unwrap());
static RE_LC_NULLABLE_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^LowCardinality\(Nullable\(String\)\)$").unwrap());
static RE_FIXED_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^FixedString\(\d+\)$").unwrap());
static RE_NULLABLE_FIXED_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Nullable\(FixedString\(\d+\)\)$").unwrap());
static RE_ENUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Enum(8|16)\(.*\)$").unwrap());
static RE_NULLABLE_ENUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Nullable\(Enum(8|16)\(.*\)\)$").unwrap());
static RE_IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^IPv[46]$").unwrap());
static RE_NULLABLE_IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Nullable\(IPv[46]\)$").unwrap());
static RE_POINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Point$").unwrap());
static RE_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Array\(.*\)$").unwrap());
static RE_MAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Map\(.*\)$").unwrap());
static RE_TUPLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Tuple\(.*\)$").unwrap());
static RE_NESTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Nested\(.*\)$").unwrap());
static RE_SIMPLE_AGGREGATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SimpleAggregateFunction\(.*\)$").unwrap());

/// `name` and `Nullable(name)` entries for a primitive scanned as itself.
fn primitive(name: &str, kind: ScanKind, field_type: FieldType) -> [TypeEntry; 2] {
    [
        TypeEntry::new(name, ScanShape::Value(kind), field_type),
        TypeEntry::new(
            format!("Nullable({})", name),
            ScanShape::Nullable(kind),
            field_type.nullable(),
        ),
    ]
}

/// 128/256-bit integers, narrowed to `Float64`.
fn wide_int(name: &str) -> [TypeEntry; 2] {
    [
        TypeEntry::new(name, ScanShape::Value(ScanKind::BigInt), FieldType::Float64)
            .with_converter(Converter::BIG_INT),
        TypeEntry::new(
            format!("Nullable({})", name),
            ScanShape::Nullable(ScanKind::BigInt),
            FieldType::NullableFloat64,
        )
        .with_converter(Converter::NULLABLE_BIG_INT),
    ]
}

fn scalar_pattern(entry: TypeEntry, re: &Lazy<Regex>) -> TypeEntry {
    entry
        .with_regex(Regex::clone(re))
        .with_priority(SCALAR_PRIORITY)
}

/// Composite column stored as nullable JSON.
fn composite(name: &str, re: &Lazy<Regex>) -> TypeEntry {
    TypeEntry::new(name, ScanShape::Any, FieldType::NullableJson)
        .with_regex(Regex::clone(re))
        .with_priority(COMPOSITE_PRIORITY)
        .with_converter(Converter::JSON)
}

/// Every built-in entry.
pub(super) fn entries() -> Vec<TypeEntry> {
    let mut entries = Vec::new();

    for (name, kind, field_type) in [
        ("Bool", ScanKind::Bool, FieldType::Bool),
        ("Int8", ScanKind::Int8, FieldType::Int8),
        ("Int16", ScanKind::Int16, FieldType::Int16),
        ("Int32", ScanKind::Int32, FieldType::Int32),
        ("Int64", ScanKind::Int64, FieldType::Int64),
        ("UInt8", ScanKind::UInt8, FieldType::Uint8),
        ("UInt16", ScanKind::UInt16, FieldType::Uint16),
        ("UInt32", ScanKind::UInt32, FieldType::Uint32),
        ("UInt64", ScanKind::UInt64, FieldType::Uint64),
        ("Float32", ScanKind::Float32, FieldType::Float32),
        ("Float64", ScanKind::Float64, FieldType::Float64),
        ("UUID", ScanKind::Uuid, FieldType::String),
    ] {
        entries.extend(primitive(name, kind, field_type));
    }

    // exact values are not representable in the frame; precision is dropped
    for name in ["Int128", "Int256", "UInt128", "UInt256"] {
        entries.extend(wide_int(name));
    }

    entries.extend([
        scalar_pattern(
            TypeEntry::new("Date", ScanShape::Value(ScanKind::Time), FieldType::Time),
            &RE_DATE,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Nullable(Date)",
                ScanShape::Nullable(ScanKind::Time),
                FieldType::NullableTime,
            ),
            &RE_NULLABLE_DATE,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Decimal",
                ScanShape::Value(ScanKind::Decimal),
                FieldType::Float64,
            )
            .with_converter(Converter::DECIMAL),
            &RE_DECIMAL,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Nullable(Decimal)",
                ScanShape::Nullable(ScanKind::Decimal),
                FieldType::NullableFloat64,
            )
            .with_converter(Converter::NULLABLE_DECIMAL),
            &RE_NULLABLE_DECIMAL,
        ),
        scalar_pattern(
            TypeEntry::new("String", ScanShape::Value(ScanKind::String), FieldType::String),
            &RE_LC_STRING,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Nullable(String)",
                ScanShape::Nullable(ScanKind::String),
                FieldType::NullableString,
            ),
            &RE_LC_NULLABLE_STRING,
        ),
        scalar_pattern(
            TypeEntry::new(
                "FixedString()",
                ScanShape::Value(ScanKind::String),
                FieldType::String,
            ),
            &RE_FIXED_STRING,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Nullable(FixedString())",
                ScanShape::Nullable(ScanKind::String),
                FieldType::NullableString,
            ),
            &RE_NULLABLE_FIXED_STRING,
        ),
        scalar_pattern(
            TypeEntry::new("Enum()", ScanShape::Value(ScanKind::String), FieldType::String),
            &RE_ENUM,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Nullable(Enum())",
                ScanShape::Nullable(ScanKind::String),
                FieldType::NullableString,
            ),
            &RE_NULLABLE_ENUM,
        ),
        scalar_pattern(
            TypeEntry::new("IP", ScanShape::Value(ScanKind::Ip), FieldType::String)
                .with_converter(Converter::IP),
            &RE_IP,
        ),
        scalar_pattern(
            TypeEntry::new(
                "Nullable(IP)",
                ScanShape::Nullable(ScanKind::Ip),
                FieldType::NullableString,
            )
            .with_converter(Converter::NULLABLE_IP),
            &RE_NULLABLE_IP,
        ),
        scalar_pattern(
            TypeEntry::new("Point", ScanShape::Any, FieldType::NullableJson)
                .with_converter(Converter::POINT),
            &RE_POINT,
        ),
        composite("Array()", &RE_ARRAY),
        composite("Map()", &RE_MAP),
        composite("Tuple()", &RE_TUPLE),
        // rows arrive as named-field objects (flatten_nested = 0)
        composite("Nested()", &RE_NESTED),
        composite("SimpleAggregateFunction()", &RE_SIMPLE_AGGREGATE),
    ]);

    entries
}
