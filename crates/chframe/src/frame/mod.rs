//! Row-to-frame materialization.
//!
//! A [`FramePlan`] resolves every result column once per query; a [`Frame`]
//! then accepts scanned rows and converts each cell with its column's binding.
//!
//! ```rust
//! use chframe::{registry, ColumnSpec, FramePlan, ScanValue, UnsupportedPolicy};
//!
//! let plan = FramePlan::new(
//!     registry(),
//!     vec![
//!         ColumnSpec::new("id", "UInt64"),
//!         ColumnSpec::new("tags", "Array(String)"),
//!     ],
//!     UnsupportedPolicy::Fail,
//! )?;
//!
//! let mut frame = plan.frame();
//! frame.append_row(&plan, vec![
//!     ScanValue::UInt64(1),
//!     ScanValue::Array(vec!["a".into(), "b".into()]),
//! ])?;
//! assert_eq!(frame.len(), 1);
//! # Ok::<(), chframe::FrameError>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::convert::Converter;
use crate::core::{ColumnSpec, FieldType, FieldValue, ScanShape, ScanValue};
use crate::error::{FrameError, Result};
use crate::registry::{Binding, TypeRegistry};

/// What to do with a column whose type no registry entry matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    /// Leave the column out of the frame.
    Skip,
    /// Keep the column as nullable JSON of whatever the driver returns.
    #[default]
    Opaque,
    /// Fail the whole plan.
    Fail,
}

/// How one planned column is converted.
#[derive(Debug, Clone, Copy)]
enum ColumnBinding<'a> {
    Resolved(Binding<'a>),
    Opaque,
}

/// One column of a [`FramePlan`].
#[derive(Debug, Clone)]
pub struct PlannedColumn<'a> {
    spec: ColumnSpec,
    binding: ColumnBinding<'a>,
}

impl<'a> PlannedColumn<'a> {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn type_name(&self) -> &str {
        &self.spec.type_name
    }

    pub fn field_type(&self) -> FieldType {
        match self.binding {
            // resolved bindings in a plan are always supported
            ColumnBinding::Resolved(b) => b.field_type().unwrap_or(FieldType::NullableJson),
            ColumnBinding::Opaque => FieldType::NullableJson,
        }
    }

    pub fn scan_shape(&self) -> ScanShape {
        match self.binding {
            ColumnBinding::Resolved(b) => b.scan_shape().unwrap_or(ScanShape::Any),
            ColumnBinding::Opaque => ScanShape::Any,
        }
    }

    /// Check if the column fell back to opaque JSON.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self.binding, ColumnBinding::Opaque)
    }

    fn convert(&self, value: ScanValue) -> Result<FieldValue> {
        match self.binding {
            ColumnBinding::Resolved(b) => b.convert(value),
            ColumnBinding::Opaque => Converter::JSON.convert(value),
        }
    }
}

/// Per-query column bindings, resolved once and reused for every row.
#[derive(Debug, Clone)]
pub struct FramePlan<'a> {
    columns: Vec<PlannedColumn<'a>>,
    /// Index into the scanned row for each planned column.
    source_index: Vec<usize>,
    /// Width of a scanned row (planned plus skipped columns).
    row_width: usize,
}

impl<'a> FramePlan<'a> {
    /// Resolve every column against `registry`.
    pub fn new(
        registry: &'a TypeRegistry,
        columns: Vec<ColumnSpec>,
        policy: UnsupportedPolicy,
    ) -> Result<Self> {
        let row_width = columns.len();
        let mut planned = Vec::with_capacity(columns.len());
        let mut source_index = Vec::with_capacity(columns.len());

        for (idx, spec) in columns.into_iter().enumerate() {
            let binding = registry.resolve(&spec.type_name);
            let binding = if binding.is_supported() {
                ColumnBinding::Resolved(binding)
            } else {
                match policy {
                    UnsupportedPolicy::Fail => {
                        return Err(FrameError::column(
                            spec.name,
                            FrameError::UnsupportedType(spec.type_name),
                        ));
                    }
                    UnsupportedPolicy::Skip => {
                        warn!(
                            "Skipping column {} with unsupported type {}",
                            spec.name, spec.type_name
                        );
                        continue;
                    }
                    UnsupportedPolicy::Opaque => {
                        warn!(
                            "Column {} has unsupported type {}, reading as JSON",
                            spec.name, spec.type_name
                        );
                        ColumnBinding::Opaque
                    }
                }
            };
            planned.push(PlannedColumn { spec, binding });
            source_index.push(idx);
        }

        debug!(
            "Planned {} of {} columns",
            planned.len(),
            row_width
        );

        Ok(Self {
            columns: planned,
            source_index,
            row_width,
        })
    }

    pub fn columns(&self) -> &[PlannedColumn<'a>] {
        &self.columns
    }

    /// Number of cells a scanned row must have.
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Empty frame with one field per planned column.
    pub fn frame(&self) -> Frame {
        Frame {
            fields: self
                .columns
                .iter()
                .map(|c| Field::new(c.name(), c.field_type()))
                .collect(),
        }
    }

    /// Serializable description of every planned column.
    pub fn summary(&self) -> Vec<PlannedColumnSummary> {
        self.columns
            .iter()
            .map(|c| PlannedColumnSummary {
                name: c.name().to_string(),
                type_name: c.type_name().to_string(),
                entry: match c.binding {
                    ColumnBinding::Resolved(b) => b.name().map(str::to_string),
                    ColumnBinding::Opaque => None,
                },
                field_type: c.field_type(),
                scan_shape: c.scan_shape(),
                opaque: c.is_opaque(),
            })
            .collect()
    }
}

/// Owned, serializable view of a [`PlannedColumn`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedColumnSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub entry: Option<String>,
    pub field_type: FieldType,
    pub scan_shape: ScanShape,
    pub opaque: bool,
}

/// One typed column of a [`Frame`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub values: Vec<FieldValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Columnar result container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub fields: Vec<Field>,
}

impl Frame {
    /// Convert and append one scanned row.
    ///
    /// The row is all-or-nothing: on error no field is modified.
    pub fn append_row(&mut self, plan: &FramePlan<'_>, row: Vec<ScanValue>) -> Result<()> {
        if row.len() != plan.row_width {
            return Err(FrameError::RowWidth {
                expected: plan.row_width,
                actual: row.len(),
            });
        }

        let mut cells: Vec<Option<ScanValue>> = row.into_iter().map(Some).collect();
        let mut converted = Vec::with_capacity(plan.columns.len());
        for (column, &src) in plan.columns.iter().zip(&plan.source_index) {
            let value = cells[src].take().unwrap_or(ScanValue::Null);
            let out = column
                .convert(value)
                .map_err(|e| FrameError::column(column.name(), e))?;
            converted.push(out);
        }

        for (field, value) in self.fields.iter_mut().zip(converted) {
            field.values.push(value);
        }
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", "UInt64"),
            ColumnSpec::new("price", "Nullable(Decimal(18,2))"),
            ColumnSpec::new("blob", "AggregateFunction(uniq, String)"),
            ColumnSpec::new("tags", "Array(String)"),
        ]
    }

    fn row(id: u64, price: Option<&str>) -> Vec<ScanValue> {
        vec![
            ScanValue::UInt64(id),
            price
                .map(|p| ScanValue::Decimal(Decimal::from_str(p).unwrap()))
                .unwrap_or(ScanValue::Null),
            ScanValue::String("opaque".into()),
            ScanValue::Array(vec!["x".into()]),
        ]
    }

    #[test]
    fn test_plan_opaque_policy() {
        let plan = FramePlan::new(registry(), columns(), UnsupportedPolicy::Opaque).unwrap();
        assert_eq!(plan.columns().len(), 4);
        assert!(plan.columns()[2].is_opaque());
        assert_eq!(plan.columns()[2].field_type(), FieldType::NullableJson);

        let mut frame = plan.frame();
        frame.append_row(&plan, row(1, Some("9.75"))).unwrap();
        frame.append_row(&plan, row(2, None)).unwrap();

        assert_eq!(frame.len(), 2);
        let price = frame.field("price").unwrap();
        assert_eq!(price.field_type, FieldType::NullableFloat64);
        assert_eq!(
            price.values,
            vec![
                FieldValue::Float64(9.75),
                FieldValue::Null(FieldType::NullableFloat64)
            ]
        );
    }

    #[test]
    fn test_plan_skip_policy() {
        let plan = FramePlan::new(registry(), columns(), UnsupportedPolicy::Skip).unwrap();
        assert_eq!(plan.columns().len(), 3);
        assert_eq!(plan.row_width(), 4);

        let mut frame = plan.frame();
        frame.append_row(&plan, row(7, Some("1.5"))).unwrap();
        assert!(frame.field("blob").is_none());
        assert_eq!(
            frame.field("tags").unwrap().values[0],
            FieldValue::Json(crate::core::RawJson::to_raw(&["x"]).unwrap())
        );
    }

    #[test]
    fn test_plan_fail_policy() {
        let err = FramePlan::new(registry(), columns(), UnsupportedPolicy::Fail).unwrap_err();
        match err {
            FrameError::Column { column, source } => {
                assert_eq!(column, "blob");
                assert!(matches!(*source, FrameError::UnsupportedType(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_width_mismatch() {
        let plan = FramePlan::new(registry(), columns(), UnsupportedPolicy::Skip).unwrap();
        let mut frame = plan.frame();
        let err = frame
            .append_row(&plan, vec![ScanValue::UInt64(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            FrameError::RowWidth {
                expected: 4,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_failed_row_leaves_frame_unchanged() {
        let plan = FramePlan::new(registry(), columns(), UnsupportedPolicy::Opaque).unwrap();
        let mut frame = plan.frame();
        frame.append_row(&plan, row(1, Some("2.00"))).unwrap();

        let mut bad = row(2, None);
        bad[1] = ScanValue::String("not a decimal".into());
        let err = frame.append_row(&plan, bad).unwrap_err();
        assert!(matches!(err, FrameError::Column { ref column, .. } if column == "price"));

        assert_eq!(frame.len(), 1);
        assert!(frame.fields.iter().all(|f| f.len() == 1));
    }

    #[test]
    fn test_frame_to_json() {
        let plan = FramePlan::new(
            registry(),
            vec![
                ColumnSpec::new("n", "Nullable(Int32)"),
                ColumnSpec::new("pair", "Tuple(Int64, String)"),
            ],
            UnsupportedPolicy::Fail,
        )
        .unwrap();
        let mut frame = plan.frame();
        frame
            .append_row(
                &plan,
                vec![
                    ScanValue::Null,
                    ScanValue::Tuple(vec![ScanValue::Int64(5), "five".into()]),
                ],
            )
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": [
                    {"name": "n", "type": "nullable_int32", "values": [null]},
                    {"name": "pair", "type": "nullable_json", "values": [[5, "five"]]}
                ]
            })
        );
    }

    #[test]
    fn test_ip_column_keeps_missing_address() {
        let plan = FramePlan::new(
            registry(),
            vec![ColumnSpec::new("peer", "IPv4")],
            UnsupportedPolicy::Fail,
        )
        .unwrap();
        let mut frame = plan.frame();
        frame
            .append_row(
                &plan,
                vec![ScanValue::Ip(std::net::IpAddr::V4(
                    std::net::Ipv4Addr::LOCALHOST,
                ))],
            )
            .unwrap();
        frame.append_row(&plan, vec![ScanValue::Null]).unwrap();

        let peer = frame.field("peer").unwrap();
        assert_eq!(peer.field_type, FieldType::String);
        assert_eq!(
            peer.values,
            vec![
                FieldValue::String("127.0.0.1".into()),
                FieldValue::Null(FieldType::String)
            ]
        );
    }

    #[test]
    fn test_summary() {
        let plan = FramePlan::new(registry(), columns(), UnsupportedPolicy::Opaque).unwrap();
        let summary = plan.summary();
        assert_eq!(summary[1].entry.as_deref(), Some("Nullable(Decimal)"));
        assert!(summary[2].opaque);
        assert_eq!(summary[2].entry, None);
    }
}
