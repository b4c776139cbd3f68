//! Error types for type resolution and value conversion.

use thiserror::Error;

use crate::core::ScanValue;

/// Main error type for registry, conversion and frame operations.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registry construction failed (duplicate entry, bad pattern)
    #[error("Registry error: {0}")]
    Registry(String),

    /// No registry entry matches the column type name
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// Conversion attempted through a binding with no type entry
    #[error("No converter bound: column type is unsupported")]
    Unbound,

    /// Scanned value does not have the representation the entry declared
    #[error("invalid {expected} - {value:?}")]
    ShapeMismatch {
        expected: &'static str,
        value: ScanValue,
    },

    /// NULL scanned into a non-nullable shape
    #[error("unexpected NULL for non-nullable {0}")]
    UnexpectedNull(&'static str),

    /// Row does not have one cell per planned column
    #[error("Row has {actual} values but the frame has {expected} columns")]
    RowWidth { expected: usize, actual: usize },

    /// Planning or conversion failed for a specific column
    #[error("Error in column {column}")]
    Column {
        column: String,
        #[source]
        source: Box<FrameError>,
    },

    /// Invalid type-name pattern
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    /// Create a ShapeMismatch error for a value that is not `expected`.
    pub fn shape(expected: &'static str, value: ScanValue) -> Self {
        FrameError::ShapeMismatch { expected, value }
    }

    /// Wrap an error with the column it occurred in.
    pub fn column(column: impl Into<String>, source: FrameError) -> Self {
        FrameError::Column {
            column: column.into(),
            source: Box::new(source),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            FrameError::Config(_) | FrameError::Yaml(_) => 2,
            FrameError::UnsupportedType(_) | FrameError::Unbound => 3,
            FrameError::Io(_) => 4,
            FrameError::Column { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

/// Result type alias for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;
