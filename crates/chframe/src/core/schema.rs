//! Column metadata as reported by the database.

use serde::{Deserialize, Serialize};

/// A result column: its name and the database's type name for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,

    /// Database type name, e.g. `Nullable(Decimal(18,4))`.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}
