//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::core::ColumnSpec;
use crate::frame::UnsupportedPolicy;

/// Root configuration structure: a column schema to plan frames for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Result columns in scan order.
    pub columns: Vec<ColumnSpec>,

    /// Handling of columns with unsupported types (default: opaque).
    #[serde(default)]
    pub unsupported: UnsupportedPolicy,
}
