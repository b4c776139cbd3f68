//! Output-type tags attached to converted columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of a frame field.
///
/// Every scalar type has a nullable counterpart. A field tagged with a
/// nullable type may hold [`FieldValue::Null`](super::FieldValue::Null)
/// cells. Non-nullable fields only hold NULL where a converter maps a
/// missing value to it: `IPv4`/`IPv6` columns keep a missing address as
/// `Null(String)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    NullableBool,
    Int8,
    NullableInt8,
    Int16,
    NullableInt16,
    Int32,
    NullableInt32,
    Int64,
    NullableInt64,
    Uint8,
    NullableUint8,
    Uint16,
    NullableUint16,
    Uint32,
    NullableUint32,
    Uint64,
    NullableUint64,
    Float32,
    NullableFloat32,
    Float64,
    NullableFloat64,
    String,
    NullableString,
    Time,
    NullableTime,
    Json,
    NullableJson,
}

impl FieldType {
    /// Check if fields of this type may hold NULL cells.
    #[must_use]
    pub fn is_nullable(self) -> bool {
        matches!(
            self,
            FieldType::NullableBool
                | FieldType::NullableInt8
                | FieldType::NullableInt16
                | FieldType::NullableInt32
                | FieldType::NullableInt64
                | FieldType::NullableUint8
                | FieldType::NullableUint16
                | FieldType::NullableUint32
                | FieldType::NullableUint64
                | FieldType::NullableFloat32
                | FieldType::NullableFloat64
                | FieldType::NullableString
                | FieldType::NullableTime
                | FieldType::NullableJson
        )
    }

    /// The nullable counterpart of this type (identity for nullable types).
    #[must_use]
    pub fn nullable(self) -> FieldType {
        match self {
            FieldType::Bool => FieldType::NullableBool,
            FieldType::Int8 => FieldType::NullableInt8,
            FieldType::Int16 => FieldType::NullableInt16,
            FieldType::Int32 => FieldType::NullableInt32,
            FieldType::Int64 => FieldType::NullableInt64,
            FieldType::Uint8 => FieldType::NullableUint8,
            FieldType::Uint16 => FieldType::NullableUint16,
            FieldType::Uint32 => FieldType::NullableUint32,
            FieldType::Uint64 => FieldType::NullableUint64,
            FieldType::Float32 => FieldType::NullableFloat32,
            FieldType::Float64 => FieldType::NullableFloat64,
            FieldType::String => FieldType::NullableString,
            FieldType::Time => FieldType::NullableTime,
            FieldType::Json => FieldType::NullableJson,
            other => other,
        }
    }

    /// The non-nullable counterpart of this type (identity for plain types).
    #[must_use]
    pub fn base(self) -> FieldType {
        match self {
            FieldType::NullableBool => FieldType::Bool,
            FieldType::NullableInt8 => FieldType::Int8,
            FieldType::NullableInt16 => FieldType::Int16,
            FieldType::NullableInt32 => FieldType::Int32,
            FieldType::NullableInt64 => FieldType::Int64,
            FieldType::NullableUint8 => FieldType::Uint8,
            FieldType::NullableUint16 => FieldType::Uint16,
            FieldType::NullableUint32 => FieldType::Uint32,
            FieldType::NullableUint64 => FieldType::Uint64,
            FieldType::NullableFloat32 => FieldType::Float32,
            FieldType::NullableFloat64 => FieldType::Float64,
            FieldType::NullableString => FieldType::String,
            FieldType::NullableTime => FieldType::Time,
            FieldType::NullableJson => FieldType::Json,
            other => other,
        }
    }

    /// Host-facing name, e.g. `nullable_float64`.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::NullableBool => "nullable_bool",
            FieldType::Int8 => "int8",
            FieldType::NullableInt8 => "nullable_int8",
            FieldType::Int16 => "int16",
            FieldType::NullableInt16 => "nullable_int16",
            FieldType::Int32 => "int32",
            FieldType::NullableInt32 => "nullable_int32",
            FieldType::Int64 => "int64",
            FieldType::NullableInt64 => "nullable_int64",
            FieldType::Uint8 => "uint8",
            FieldType::NullableUint8 => "nullable_uint8",
            FieldType::Uint16 => "uint16",
            FieldType::NullableUint16 => "nullable_uint16",
            FieldType::Uint32 => "uint32",
            FieldType::NullableUint32 => "nullable_uint32",
            FieldType::Uint64 => "uint64",
            FieldType::NullableUint64 => "nullable_uint64",
            FieldType::Float32 => "float32",
            FieldType::NullableFloat32 => "nullable_float32",
            FieldType::Float64 => "float64",
            FieldType::NullableFloat64 => "nullable_float64",
            FieldType::String => "string",
            FieldType::NullableString => "nullable_string",
            FieldType::Time => "time",
            FieldType::NullableTime => "nullable_time",
            FieldType::Json => "json",
            FieldType::NullableJson => "nullable_json",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
