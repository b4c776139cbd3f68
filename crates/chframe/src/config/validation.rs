//! Configuration validation.

use std::collections::HashSet;

use super::Config;
use crate::error::{FrameError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.columns.is_empty() {
        return Err(FrameError::Config("columns must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for (idx, col) in config.columns.iter().enumerate() {
        if col.name.trim().is_empty() {
            return Err(FrameError::Config(format!(
                "columns[{}].name is required",
                idx
            )));
        }
        if col.type_name.trim().is_empty() {
            return Err(FrameError::Config(format!(
                "columns[{}].type is required for column '{}'",
                idx, col.name
            )));
        }
        if !seen.insert(col.name.as_str()) {
            return Err(FrameError::Config(format!(
                "duplicate column name '{}'",
                col.name
            )));
        }
    }

    Ok(())
}
