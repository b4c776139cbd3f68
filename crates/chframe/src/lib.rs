//! # chframe
//!
//! Maps ClickHouse column values onto typed, columnar data frames.
//!
//! For every column type, including nullable variants, wide integers,
//! decimals, temporal types, network addresses, points and composite types,
//! the library decides:
//!
//! - **Scan shape**: the representation the driver fills for each cell
//! - **Field type**: the output type the frame column is tagged with
//! - **Converter**: the function turning a scanned cell into a frame cell
//!
//! ## Example
//!
//! ```rust
//! use chframe::{registry, FieldType, FieldValue, ScanValue};
//!
//! let binding = registry().resolve("Int128");
//! assert_eq!(binding.field_type(), Some(FieldType::Float64));
//!
//! let value = binding.convert(ScanValue::Int128(1 << 100))?;
//! assert_eq!(value, FieldValue::Float64(2f64.powi(100)));
//! # Ok::<(), chframe::FrameError>(())
//! ```

pub mod config;
pub mod convert;
pub mod core;
pub mod error;
pub mod frame;
pub mod registry;

// Re-exports for convenient access
pub use crate::core::{
    ColumnSpec, FieldType, FieldValue, Int256, Point, RawJson, ScanKind, ScanShape, ScanValue,
};
pub use config::Config;
pub use convert::{ConvertFn, Converter};
pub use error::{FrameError, Result};
pub use frame::{Field, Frame, FramePlan, UnsupportedPolicy};
pub use registry::{
    is_complex_type, registry, Binding, BindingSummary, TypeEntry, TypeRegistry,
    TypeRegistryBuilder,
};
