//! Scan-target shapes the row scanner allocates per column.

use std::fmt;

use serde::{Serialize, Serializer};

use super::value::ScanValue;

/// Concrete representation held by a scan target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// 128 or 256-bit integer, signed or unsigned.
    BigInt,
    Decimal,
    Time,
    String,
    Uuid,
    Ip,
}

impl ScanKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScanKind::Bool => "bool",
            ScanKind::Int8 => "int8",
            ScanKind::Int16 => "int16",
            ScanKind::Int32 => "int32",
            ScanKind::Int64 => "int64",
            ScanKind::UInt8 => "uint8",
            ScanKind::UInt16 => "uint16",
            ScanKind::UInt32 => "uint32",
            ScanKind::UInt64 => "uint64",
            ScanKind::Float32 => "float32",
            ScanKind::Float64 => "float64",
            ScanKind::BigInt => "big_int",
            ScanKind::Decimal => "decimal",
            ScanKind::Time => "time",
            ScanKind::String => "string",
            ScanKind::Uuid => "uuid",
            ScanKind::Ip => "ip",
        }
    }

    /// Check if a non-null scanned value has this representation.
    pub fn matches(self, value: &ScanValue) -> bool {
        matches!(
            (self, value),
            (ScanKind::Bool, ScanValue::Bool(_))
                | (ScanKind::Int8, ScanValue::Int8(_))
                | (ScanKind::Int16, ScanValue::Int16(_))
                | (ScanKind::Int32, ScanValue::Int32(_))
                | (ScanKind::Int64, ScanValue::Int64(_))
                | (ScanKind::UInt8, ScanValue::UInt8(_))
                | (ScanKind::UInt16, ScanValue::UInt16(_))
                | (ScanKind::UInt32, ScanValue::UInt32(_))
                | (ScanKind::UInt64, ScanValue::UInt64(_))
                | (ScanKind::Float32, ScanValue::Float32(_))
                | (ScanKind::Float64, ScanValue::Float64(_))
                | (ScanKind::BigInt, ScanValue::Int128(_))
                | (ScanKind::BigInt, ScanValue::UInt128(_))
                | (ScanKind::BigInt, ScanValue::Int256(_))
                | (ScanKind::Decimal, ScanValue::Decimal(_))
                | (ScanKind::Time, ScanValue::DateTime(_))
                | (ScanKind::String, ScanValue::String(_))
                | (ScanKind::Uuid, ScanValue::Uuid(_))
                | (ScanKind::Ip, ScanValue::Ip(_))
        )
    }
}

impl Serialize for ScanKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Shape of the buffer a column is scanned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", content = "kind", rename_all = "snake_case")]
pub enum ScanShape {
    /// Always holds a value of the given kind.
    Value(ScanKind),
    /// Holds a value of the given kind or NULL.
    Nullable(ScanKind),
    /// Holds any scanned value (composite and geometric columns).
    Any,
}

impl ScanShape {
    #[must_use]
    pub fn is_nullable(self) -> bool {
        matches!(self, ScanShape::Nullable(_) | ScanShape::Any)
    }

    /// The representation this shape holds, `None` for [`ScanShape::Any`].
    pub fn kind(self) -> Option<ScanKind> {
        match self {
            ScanShape::Value(kind) | ScanShape::Nullable(kind) => Some(kind),
            ScanShape::Any => None,
        }
    }

    /// Check if a scanned value fits this shape.
    pub fn accepts(self, value: &ScanValue) -> bool {
        match self {
            ScanShape::Any => true,
            ScanShape::Nullable(_) if value.is_null() => true,
            ScanShape::Value(kind) | ScanShape::Nullable(kind) => kind.matches(value),
        }
    }
}

impl fmt::Display for ScanShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanShape::Value(kind) => f.write_str(kind.as_str()),
            ScanShape::Nullable(kind) => write!(f, "nullable {}", kind.as_str()),
            ScanShape::Any => f.write_str("any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts() {
        let shape = ScanShape::Nullable(ScanKind::Decimal);
        assert!(shape.accepts(&ScanValue::Null));
        assert!(shape.accepts(&ScanValue::Decimal(rust_decimal::Decimal::ONE)));
        assert!(!shape.accepts(&ScanValue::Float64(1.0)));

        assert!(!ScanShape::Value(ScanKind::Int64).accepts(&ScanValue::Null));
        assert!(ScanShape::Any.accepts(&ScanValue::Array(vec![])));
    }

    #[test]
    fn test_big_int_kind_covers_all_widths() {
        assert!(ScanKind::BigInt.matches(&ScanValue::Int128(-1)));
        assert!(ScanKind::BigInt.matches(&ScanValue::UInt128(1)));
        assert!(ScanKind::BigInt.matches(&ScanValue::Int256(1u128.into())));
        assert!(!ScanKind::BigInt.matches(&ScanValue::Int64(1)));
    }

    #[test]
    fn test_json_names_match_as_str() {
        let kinds = [
            ScanKind::Bool,
            ScanKind::Int8,
            ScanKind::Int16,
            ScanKind::Int32,
            ScanKind::Int64,
            ScanKind::UInt8,
            ScanKind::UInt16,
            ScanKind::UInt32,
            ScanKind::UInt64,
            ScanKind::Float32,
            ScanKind::Float64,
            ScanKind::BigInt,
            ScanKind::Decimal,
            ScanKind::Time,
            ScanKind::String,
            ScanKind::Uuid,
            ScanKind::Ip,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }

        let json = serde_json::to_string(&ScanShape::Nullable(ScanKind::UInt8)).unwrap();
        assert_eq!(json, r#"{"shape":"nullable","kind":"uint8"}"#);
        assert_eq!(
            serde_json::to_string(&ScanShape::Any).unwrap(),
            r#"{"shape":"any"}"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ScanShape::Value(ScanKind::Ip).to_string(), "ip");
        assert_eq!(
            ScanShape::Nullable(ScanKind::Time).to_string(),
            "nullable time"
        );
    }
}
