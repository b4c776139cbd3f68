//! Converters from scanned cells to frame cells.
//!
//! Each converter accepts exactly the representation its registry entry
//! declares and returns [`FrameError::ShapeMismatch`] for anything else.
//! Wide integers and decimals are narrowed to `f64`; the lost precision is
//! not reported.

use std::net::IpAddr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::core::{FieldType, FieldValue, RawJson, ScanKind, ScanShape, ScanValue};
use crate::error::{FrameError, Result};

/// Signature shared by all converters.
pub type ConvertFn = fn(ScanValue) -> Result<FieldValue>;

/// A named converter function, as installed in registry entries.
#[derive(Clone, Copy)]
pub struct Converter {
    pub name: &'static str,
    pub func: ConvertFn,
}

impl Converter {
    pub const BIG_INT: Converter = Converter::new("big_int", big_int);
    pub const NULLABLE_BIG_INT: Converter = Converter::new("nullable_big_int", nullable_big_int);
    pub const DECIMAL: Converter = Converter::new("decimal", decimal);
    pub const NULLABLE_DECIMAL: Converter = Converter::new("nullable_decimal", nullable_decimal);
    pub const IP: Converter = Converter::new("ip", ip);
    pub const NULLABLE_IP: Converter = Converter::new("nullable_ip", nullable_ip);
    pub const JSON: Converter = Converter::new("json", json);
    pub const POINT: Converter = Converter::new("point", point);

    pub const fn new(name: &'static str, func: ConvertFn) -> Self {
        Self { name, func }
    }

    pub fn convert(&self, value: ScanValue) -> Result<FieldValue> {
        (self.func)(value)
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}

/// Default converter: unwrap a scalar according to its declared shape.
///
/// NULL becomes a typed NULL for nullable shapes and an error otherwise.
pub fn unwrap(shape: ScanShape, field_type: FieldType, value: ScanValue) -> Result<FieldValue> {
    let Some(kind) = shape.kind() else {
        return Err(FrameError::shape("scalar", value));
    };
    if value.is_null() {
        if shape.is_nullable() {
            return Ok(FieldValue::Null(field_type));
        }
        return Err(FrameError::UnexpectedNull(kind.as_str()));
    }
    if !kind.matches(&value) {
        return Err(FrameError::shape(kind.as_str(), value));
    }

    Ok(match value {
        ScanValue::Bool(v) => FieldValue::Bool(v),
        ScanValue::Int8(v) => FieldValue::Int8(v),
        ScanValue::Int16(v) => FieldValue::Int16(v),
        ScanValue::Int32(v) => FieldValue::Int32(v),
        ScanValue::Int64(v) => FieldValue::Int64(v),
        ScanValue::UInt8(v) => FieldValue::Uint8(v),
        ScanValue::UInt16(v) => FieldValue::Uint16(v),
        ScanValue::UInt32(v) => FieldValue::Uint32(v),
        ScanValue::UInt64(v) => FieldValue::Uint64(v),
        ScanValue::Float32(v) => FieldValue::Float32(v),
        ScanValue::Float64(v) => FieldValue::Float64(v),
        ScanValue::DateTime(v) => FieldValue::Time(v),
        ScanValue::String(v) => FieldValue::String(v),
        ScanValue::Uuid(v) => FieldValue::String(v.hyphenated().to_string()),
        ScanValue::Ip(v) => FieldValue::String(canonical_ip(v)),
        // wide integers and decimals need a narrowing converter
        other => return Err(FrameError::shape(kind.as_str(), other)),
    })
}

fn big_int_to_f64(value: ScanValue) -> Result<f64> {
    match value {
        ScanValue::Int128(v) => Ok(v as f64),
        ScanValue::UInt128(v) => Ok(v as f64),
        ScanValue::Int256(v) => Ok(v.to_f64()),
        other => Err(FrameError::shape(ScanKind::BigInt.as_str(), other)),
    }
}

/// `Int128`/`UInt128`/`Int256`/`UInt256` to `Float64`; NULL becomes 0.
pub fn big_int(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Float64(0.0));
    }
    big_int_to_f64(value).map(FieldValue::Float64)
}

/// Nullable wide integers to `NullableFloat64`.
pub fn nullable_big_int(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null(FieldType::NullableFloat64));
    }
    big_int_to_f64(value).map(FieldValue::Float64)
}

fn decimal_to_f64(value: ScanValue) -> Result<f64> {
    match value {
        ScanValue::Decimal(d) => Ok(narrow_decimal(d)),
        other => Err(FrameError::shape("decimal", other)),
    }
}

fn narrow_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// `Decimal(P, S)` to `Float64`; NULL becomes 0.
pub fn decimal(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Float64(0.0));
    }
    decimal_to_f64(value).map(FieldValue::Float64)
}

/// `Nullable(Decimal(P, S))` to `NullableFloat64`.
pub fn nullable_decimal(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null(FieldType::NullableFloat64));
    }
    decimal_to_f64(value).map(FieldValue::Float64)
}

/// Textual form of an address; IPv4-mapped IPv6 addresses print dotted.
fn canonical_ip(addr: IpAddr) -> String {
    match addr {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        },
        IpAddr::V4(v4) => v4.to_string(),
    }
}

fn ip_to_string(value: ScanValue) -> Result<String> {
    match value {
        ScanValue::Ip(addr) => Ok(canonical_ip(addr)),
        other => Err(FrameError::shape("ip", other)),
    }
}

/// `IPv4`/`IPv6` to `String`. A missing address stays NULL.
pub fn ip(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null(FieldType::String));
    }
    ip_to_string(value).map(FieldValue::String)
}

/// `Nullable(IPv4)`/`Nullable(IPv6)` to `NullableString`.
pub fn nullable_ip(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null(FieldType::NullableString));
    }
    ip_to_string(value).map(FieldValue::String)
}

/// Any composite value to a raw JSON document.
pub fn json(value: ScanValue) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null(FieldType::NullableJson));
    }
    Ok(FieldValue::Json(RawJson::to_raw(&value)?))
}

/// `Point` to a `[x, y]` JSON document.
pub fn point(value: ScanValue) -> Result<FieldValue> {
    match value {
        ScanValue::Null => Ok(FieldValue::Null(FieldType::NullableJson)),
        ScanValue::Point(p) => Ok(FieldValue::Json(RawJson::to_raw(&p)?)),
        other => Err(FrameError::shape("point", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Int256, Point};
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::str::FromStr;

    #[test]
    fn test_unwrap_primitives() {
        let shape = ScanShape::Value(ScanKind::Int32);
        assert_eq!(
            unwrap(shape, FieldType::Int32, ScanValue::Int32(7)).unwrap(),
            FieldValue::Int32(7)
        );

        let shape = ScanShape::Nullable(ScanKind::UInt16);
        assert_eq!(
            unwrap(shape, FieldType::NullableUint16, ScanValue::UInt16(9)).unwrap(),
            FieldValue::Uint16(9)
        );
        assert_eq!(
            unwrap(shape, FieldType::NullableUint16, ScanValue::Null).unwrap(),
            FieldValue::Null(FieldType::NullableUint16)
        );
    }

    #[test]
    fn test_unwrap_rejects_null_for_non_nullable() {
        let err = unwrap(ScanShape::Value(ScanKind::Bool), FieldType::Bool, ScanValue::Null)
            .unwrap_err();
        assert!(matches!(err, FrameError::UnexpectedNull("bool")));
    }

    #[test]
    fn test_unwrap_rejects_wrong_kind() {
        let err = unwrap(
            ScanShape::Value(ScanKind::Float64),
            FieldType::Float64,
            ScanValue::Float32(1.0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FrameError::ShapeMismatch {
                expected: "float64",
                ..
            }
        ));

        let err = unwrap(ScanShape::Any, FieldType::NullableJson, ScanValue::Int64(1)).unwrap_err();
        assert!(matches!(err, FrameError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_unwrap_uuid_renders_hyphenated() {
        let id = uuid::Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let out = unwrap(
            ScanShape::Value(ScanKind::Uuid),
            FieldType::String,
            ScanValue::Uuid(id),
        )
        .unwrap();
        assert_eq!(out.as_str(), Some("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    }

    #[test]
    fn test_big_int_precision_loss() {
        let out = big_int(ScanValue::Int128(1i128 << 100)).unwrap();
        assert_eq!(out, FieldValue::Float64(2f64.powi(100)));

        let out = big_int(ScanValue::UInt128(u128::MAX)).unwrap();
        assert_eq!(out, FieldValue::Float64(2f64.powi(128)));

        let out = big_int(ScanValue::Int256(Int256::from(-5i128))).unwrap();
        assert_eq!(out, FieldValue::Float64(-5.0));
    }

    #[test]
    fn test_big_int_null_handling() {
        assert_eq!(big_int(ScanValue::Null).unwrap(), FieldValue::Float64(0.0));
        assert_eq!(
            nullable_big_int(ScanValue::Null).unwrap(),
            FieldValue::Null(FieldType::NullableFloat64)
        );
        assert_eq!(
            nullable_big_int(ScanValue::UInt128(3)).unwrap(),
            FieldValue::Float64(3.0)
        );
        assert!(big_int(ScanValue::Int64(3)).is_err());
    }

    #[test]
    fn test_decimal() {
        let d = Decimal::from_str("12.50").unwrap();
        assert_eq!(
            decimal(ScanValue::Decimal(d)).unwrap(),
            FieldValue::Float64(12.5)
        );
        assert_eq!(
            nullable_decimal(ScanValue::Decimal(d)).unwrap(),
            FieldValue::Float64(12.5)
        );
        assert_eq!(
            nullable_decimal(ScanValue::Null).unwrap(),
            FieldValue::Null(FieldType::NullableFloat64)
        );
        assert_eq!(decimal(ScanValue::Null).unwrap(), FieldValue::Float64(0.0));
    }

    #[test]
    fn test_decimal_shape_mismatch() {
        let err = decimal(ScanValue::String("12.50".into())).unwrap_err();
        match err {
            FrameError::ShapeMismatch { expected, value } => {
                assert_eq!(expected, "decimal");
                assert_eq!(value, ScanValue::String("12.50".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(nullable_decimal(ScanValue::Float64(1.0)).is_err());
    }

    #[test]
    fn test_ip() {
        let v4 = ScanValue::Ip(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1)));
        assert_eq!(ip(v4).unwrap().as_str(), Some("192.168.0.1"));

        let mapped = ScanValue::Ip(IpAddr::V6(Ipv4Addr::new(10, 0, 0, 1).to_ipv6_mapped()));
        assert_eq!(ip(mapped).unwrap().as_str(), Some("10.0.0.1"));

        let v6 = ScanValue::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert_eq!(nullable_ip(v6).unwrap().as_str(), Some("::1"));

        assert_eq!(
            ip(ScanValue::Null).unwrap(),
            FieldValue::Null(FieldType::String)
        );
        assert_eq!(
            nullable_ip(ScanValue::Null).unwrap(),
            FieldValue::Null(FieldType::NullableString)
        );
        assert!(ip(ScanValue::String("1.2.3.4".into())).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let value = ScanValue::Tuple(vec![ScanValue::Int64(1), ScanValue::String("x".into())]);
        let out = json(value).unwrap();
        let FieldValue::Json(raw) = out else {
            panic!("expected json");
        };
        assert_eq!(raw.parse().unwrap(), serde_json::json!([1, "x"]));

        assert_eq!(
            json(ScanValue::Null).unwrap(),
            FieldValue::Null(FieldType::NullableJson)
        );
    }

    #[test]
    fn test_json_nested_rows() {
        let rows = ScanValue::Array(vec![ScanValue::Object(vec![
            ("id".into(), ScanValue::UInt32(1)),
            ("tags".into(), ScanValue::Array(vec!["a".into()])),
        ])]);
        let FieldValue::Json(raw) = json(rows).unwrap() else {
            panic!("expected json");
        };
        assert_eq!(raw.as_str(), r#"[{"id":1,"tags":["a"]}]"#);
    }

    #[test]
    fn test_json_bad_map_key() {
        let value = ScanValue::Map(vec![(ScanValue::Tuple(vec![]), ScanValue::Int64(1))]);
        assert!(matches!(json(value), Err(FrameError::Json(_))));
    }

    #[test]
    fn test_point() {
        let FieldValue::Json(raw) = point(ScanValue::Point(Point::new(3.0, 4.5))).unwrap() else {
            panic!("expected json");
        };
        assert_eq!(raw.parse().unwrap(), serde_json::json!([3.0, 4.5]));

        assert!(point(ScanValue::Null).unwrap().is_null());
        assert!(matches!(
            point(ScanValue::Tuple(vec![ScanValue::Float64(1.0)])),
            Err(FrameError::ShapeMismatch {
                expected: "point",
                ..
            })
        ));
    }
}
