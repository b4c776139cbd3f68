//! Scanned and converted value types.
//!
//! [`ScanValue`] is what the database driver hands back for one cell. It is a
//! tagged union over every representation a scan shape can declare, so a
//! converter checks the tag once instead of probing the value's runtime type.
//! [`FieldValue`] is the converted cell stored in a frame field.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use uuid::Uuid;

use super::field_type::FieldType;

/// 256-bit integer stored as four little-endian 64-bit words.
///
/// Signed values use two's complement, matching the wire layout of
/// `Int256`/`UInt256` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int256 {
    words: [u64; 4],
    signed: bool,
}

impl Int256 {
    /// Build a signed value from little-endian words.
    pub fn signed_from_words(words: [u64; 4]) -> Self {
        Self {
            words,
            signed: true,
        }
    }

    /// Build an unsigned value from little-endian words.
    pub fn unsigned_from_words(words: [u64; 4]) -> Self {
        Self {
            words,
            signed: false,
        }
    }

    /// Build a value from 32 little-endian bytes.
    pub fn from_le_bytes(bytes: [u8; 32], signed: bool) -> Self {
        let mut words = [0u64; 4];
        for (i, word) in words.iter_mut().enumerate() {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            *word = u64::from_le_bytes(chunk);
        }
        Self { words, signed }
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.signed && self.words[3] >> 63 == 1
    }

    /// Absolute value as (high, low) 128-bit halves.
    fn magnitude(&self) -> (u128, u128) {
        let hi = (u128::from(self.words[3]) << 64) | u128::from(self.words[2]);
        let lo = (u128::from(self.words[1]) << 64) | u128::from(self.words[0]);
        if !self.is_negative() {
            return (hi, lo);
        }
        let (lo, carry) = (!lo).overflowing_add(1);
        let hi = (!hi).wrapping_add(u128::from(carry));
        (hi, lo)
    }

    /// Nearest `f64`, rounding to nearest-even.
    pub fn to_f64(&self) -> f64 {
        let (hi, lo) = self.magnitude();
        let abs = if hi == 0 {
            lo as f64
        } else {
            let lz = hi.leading_zeros();
            let (mut top, rest) = if lz == 0 {
                (hi, lo)
            } else {
                ((hi << lz) | (lo >> (128 - lz)), lo << lz)
            };
            // sticky bit keeps round-to-nearest correct for the dropped low bits
            if rest != 0 {
                top |= 1;
            }
            top as f64 * 2f64.powi(128 - lz as i32)
        };
        if self.is_negative() {
            -abs
        } else {
            abs
        }
    }
}

impl From<i128> for Int256 {
    fn from(v: i128) -> Self {
        let fill = if v < 0 { u64::MAX } else { 0 };
        let bits = v as u128;
        Self::signed_from_words([bits as u64, (bits >> 64) as u64, fill, fill])
    }
}

impl From<u128> for Int256 {
    fn from(v: u128) -> Self {
        Self::unsigned_from_words([v as u64, (v >> 64) as u64, 0, 0])
    }
}

impl fmt::Display for Int256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CHUNK: u64 = 10_000_000_000_000_000_000;

        let (hi, lo) = self.magnitude();
        let mut words = [
            (hi >> 64) as u64,
            hi as u64,
            (lo >> 64) as u64,
            lo as u64,
        ];
        let mut chunks = Vec::new();
        while words.iter().any(|w| *w != 0) {
            let mut rem: u128 = 0;
            for word in words.iter_mut() {
                let cur = (rem << 64) | u128::from(*word);
                *word = (cur / u128::from(CHUNK)) as u64;
                rem = cur % u128::from(CHUNK);
            }
            chunks.push(rem as u64);
        }

        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        match chunks.split_last() {
            None => out.push('0'),
            Some((first, rest)) => {
                out.push_str(&first.to_string());
                for chunk in rest.iter().rev() {
                    out.push_str(&format!("{:019}", chunk));
                }
            }
        }
        f.write_str(&out)
    }
}

/// Two-coordinate geometric point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.x)?;
        tup.serialize_element(&self.y)?;
        tup.end()
    }
}

/// A single cell as produced by the database driver.
///
/// `Null` is the present-but-null state of a nullable scan target.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Int128(i128),
    UInt128(u128),
    /// `Int256` or `UInt256`, see [`Int256::is_signed`].
    Int256(Int256),
    Decimal(Decimal),
    DateTime(DateTime<FixedOffset>),
    String(String),
    Uuid(Uuid),
    Ip(IpAddr),
    Point(Point),
    Array(Vec<ScanValue>),
    Tuple(Vec<ScanValue>),
    /// Key/value pairs in column order.
    Map(Vec<(ScanValue, ScanValue)>),
    /// Named fields of a named tuple or one `Nested` row.
    Object(Vec<(String, ScanValue)>),
}

impl ScanValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScanValue::Null)
    }
}

impl Serialize for ScanValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScanValue::Null => serializer.serialize_none(),
            ScanValue::Bool(v) => serializer.serialize_bool(*v),
            ScanValue::Int8(v) => serializer.serialize_i8(*v),
            ScanValue::Int16(v) => serializer.serialize_i16(*v),
            ScanValue::Int32(v) => serializer.serialize_i32(*v),
            ScanValue::Int64(v) => serializer.serialize_i64(*v),
            ScanValue::UInt8(v) => serializer.serialize_u8(*v),
            ScanValue::UInt16(v) => serializer.serialize_u16(*v),
            ScanValue::UInt32(v) => serializer.serialize_u32(*v),
            ScanValue::UInt64(v) => serializer.serialize_u64(*v),
            ScanValue::Float32(v) => serializer.serialize_f32(*v),
            ScanValue::Float64(v) => serializer.serialize_f64(*v),
            ScanValue::Int128(v) => serializer.collect_str(v),
            ScanValue::UInt128(v) => serializer.collect_str(v),
            ScanValue::Int256(v) => serializer.collect_str(v),
            ScanValue::Decimal(v) => serializer.collect_str(v),
            ScanValue::DateTime(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ScanValue::String(v) => serializer.serialize_str(v),
            ScanValue::Uuid(v) => serializer.collect_str(&v.hyphenated()),
            ScanValue::Ip(v) => serializer.collect_str(v),
            ScanValue::Point(v) => v.serialize(serializer),
            ScanValue::Array(items) | ScanValue::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ScanValue::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            ScanValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for ScanValue {
    fn from(v: bool) -> Self {
        ScanValue::Bool(v)
    }
}

impl From<i64> for ScanValue {
    fn from(v: i64) -> Self {
        ScanValue::Int64(v)
    }
}

impl From<f64> for ScanValue {
    fn from(v: f64) -> Self {
        ScanValue::Float64(v)
    }
}

impl From<&str> for ScanValue {
    fn from(v: &str) -> Self {
        ScanValue::String(v.to_string())
    }
}

impl From<String> for ScanValue {
    fn from(v: String) -> Self {
        ScanValue::String(v)
    }
}

impl From<Decimal> for ScanValue {
    fn from(v: Decimal) -> Self {
        ScanValue::Decimal(v)
    }
}

impl From<IpAddr> for ScanValue {
    fn from(v: IpAddr) -> Self {
        ScanValue::Ip(v)
    }
}

impl<T: Into<ScanValue>> From<Option<T>> for ScanValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ScanValue::Null, Into::into)
    }
}

/// Raw JSON document stored in a JSON field.
#[derive(Debug, Clone)]
pub struct RawJson(Box<RawValue>);

impl RawJson {
    /// Serialize a value into a raw JSON document.
    pub fn to_raw<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Self> {
        serde_json::value::to_raw_value(value).map(RawJson)
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }

    /// Parse the document into a structured value.
    pub fn parse(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(self.0.get())
    }
}

impl PartialEq for RawJson {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for RawJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// A converted cell, ready to be appended to a frame field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// NULL tagged with the field type it belongs to.
    Null(FieldType),
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Time(DateTime<FixedOffset>),
    Json(RawJson),
}

impl FieldValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null(_))
    }

    /// The float payload, if this is a `Float64` cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a `String` cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null(_) => serializer.serialize_none(),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Int8(v) => serializer.serialize_i8(*v),
            FieldValue::Int16(v) => serializer.serialize_i16(*v),
            FieldValue::Int32(v) => serializer.serialize_i32(*v),
            FieldValue::Int64(v) => serializer.serialize_i64(*v),
            FieldValue::Uint8(v) => serializer.serialize_u8(*v),
            FieldValue::Uint16(v) => serializer.serialize_u16(*v),
            FieldValue::Uint32(v) => serializer.serialize_u32(*v),
            FieldValue::Uint64(v) => serializer.serialize_u64(*v),
            FieldValue::Float32(v) => serializer.serialize_f32(*v),
            FieldValue::Float64(v) => serializer.serialize_f64(*v),
            FieldValue::String(v) => serializer.serialize_str(v),
            FieldValue::Time(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Json(v) => v.serialize(serializer),
        }
    }
}
