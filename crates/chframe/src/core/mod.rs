//! Core value and metadata types shared by the registry and converters.
//!
//! - [`value`]: scanned cells ([`ScanValue`]) and converted cells ([`FieldValue`])
//! - [`shape`]: scan-target shapes declared by registry entries
//! - [`field_type`]: output-type tags for frame fields
//! - [`schema`]: column metadata

pub mod field_type;
pub mod schema;
pub mod shape;
pub mod value;

pub use field_type::FieldType;
pub use schema::ColumnSpec;
pub use shape::{ScanKind, ScanShape};
pub use value::{FieldValue, Int256, Point, RawJson, ScanValue};
