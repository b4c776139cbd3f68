//! Type registry and column-type resolution.
//!
//! The [`TypeRegistry`] maps ClickHouse column type names to the scan shape the
//! driver fills, the field type the frame column carries, and the converter
//! between the two. It is built once and never mutated afterwards, so a shared
//! reference can be used from any number of threads without locking.
//!
//! # Resolution
//!
//! [`TypeRegistry::resolve`] runs in two phases:
//!
//! 1. **Exact**: the type name equals an entry name verbatim.
//! 2. **Pattern**: the first entry, in `(priority, name)` order, whose pattern
//!    matches the type name.
//!
//! A name matching nothing yields an unsupported [`Binding`].
//!
//! # Example
//!
//! ```rust
//! use chframe::{registry, FieldType, ScanValue};
//!
//! let binding = registry().resolve("Nullable(Decimal(18,4))");
//! assert_eq!(binding.field_type(), Some(FieldType::NullableFloat64));
//! assert!(binding.convert(ScanValue::Null).unwrap().is_null());
//! ```

mod builtins;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::convert::{self, Converter};
use crate::core::{FieldType, FieldValue, ScanShape, ScanValue};
use crate::error::{FrameError, Result};

/// Priority assigned to entries that don't set one.
pub const DEFAULT_PRIORITY: u8 = 100;

/// Column types whose host-side handling differs from plain JSON columns.
pub const COMPLEX_TYPES: &[&str] = &["Map"];

/// One registry entry: how a family of column types is scanned and converted.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    name: String,
    pattern: Option<Regex>,
    priority: u8,
    scan_shape: ScanShape,
    field_type: FieldType,
    converter: Option<Converter>,
}

impl TypeEntry {
    /// Create an exact-name entry using the default unwrap converter.
    pub fn new(name: impl Into<String>, scan_shape: ScanShape, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            pattern: None,
            priority: DEFAULT_PRIORITY,
            scan_shape,
            field_type,
            converter: None,
        }
    }

    /// Also match type names satisfying `pattern`.
    pub fn matching(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Also match type names satisfying an already compiled pattern.
    pub fn with_regex(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Order among pattern entries; lower values are tried first.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the default unwrap converter.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn scan_shape(&self) -> ScanShape {
        self.scan_shape
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// The explicit converter, `None` when the default unwrap applies.
    pub fn converter(&self) -> Option<Converter> {
        self.converter
    }

    fn matches(&self, type_name: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(type_name))
    }
}

/// Collects entries before freezing them into a [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    entries: Vec<TypeEntry>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with the built-in ClickHouse entries.
    pub fn with_builtins() -> Self {
        Self {
            entries: builtins::entries(),
        }
    }

    /// Register an entry. Names must be unique.
    pub fn register(&mut self, entry: TypeEntry) -> Result<&mut Self> {
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(FrameError::Registry(format!(
                "duplicate type entry: {}",
                entry.name
            )));
        }
        self.entries.push(entry);
        Ok(self)
    }

    /// Freeze the entries. The result cannot be modified.
    pub fn build(self) -> TypeRegistry {
        let mut entries = self.entries;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();

        let mut patterned: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.pattern.is_some())
            .map(|(i, _)| i)
            .collect();
        // entries are already sorted by name, so a stable sort keeps name order within a priority
        patterned.sort_by_key(|&i| entries[i].priority);

        debug!(
            "Built type registry with {} entries ({} patterns)",
            entries.len(),
            patterned.len()
        );

        TypeRegistry {
            entries,
            index,
            patterned,
        }
    }
}

/// Immutable set of type entries keyed by name.
#[derive(Debug)]
pub struct TypeRegistry {
    /// Entries sorted by name.
    entries: Vec<TypeEntry>,
    /// Entry position by exact name.
    index: HashMap<String, usize>,
    /// Positions of pattern entries in resolution order.
    patterned: Vec<usize>,
}

static BUILTIN: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::with_builtins);

/// Process-wide registry with the built-in entries, built on first use.
pub fn registry() -> &'static TypeRegistry {
    &BUILTIN
}

impl TypeRegistry {
    /// Create a registry holding the built-in ClickHouse entries.
    ///
    /// Prefer [`registry()`] unless the registry should be owned and passed
    /// explicitly.
    pub fn with_builtins() -> Self {
        TypeRegistryBuilder::with_builtins().build()
    }

    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Get an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// All entries, sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter()
    }

    /// All entry names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// One binding per entry, for installing a driver-wide converter list.
    pub fn bindings(&self) -> impl Iterator<Item = Binding<'_>> {
        self.entries.iter().map(Binding::from_entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a column type name to its binding.
    ///
    /// Never fails: an unknown type yields [`Binding::unsupported`].
    pub fn resolve(&self, type_name: &str) -> Binding<'_> {
        if let Some(entry) = self.get(type_name) {
            trace!("{}: exact match", type_name);
            return Binding::from_entry(entry);
        }

        let matched = self
            .patterned
            .iter()
            .map(|&i| &self.entries[i])
            .find(|e| e.matches(type_name));

        match matched {
            Some(entry) => {
                trace!("{}: matched pattern of {}", type_name, entry.name);
                Binding::from_entry(entry)
            }
            None => {
                debug!("{}: no matching type entry", type_name);
                Binding::unsupported()
            }
        }
    }

    /// Resolve a column type name, treating an unsupported type as an error.
    pub fn require(&self, type_name: &str) -> Result<Binding<'_>> {
        let binding = self.resolve(type_name);
        if binding.is_supported() {
            Ok(binding)
        } else {
            Err(FrameError::UnsupportedType(type_name.to_string()))
        }
    }

    /// Names of every pattern entry matching `type_name`, in resolution order.
    ///
    /// More than one name means the patterns overlap for this type and the
    /// outcome depends on priority.
    pub fn overlapping_patterns(&self, type_name: &str) -> Vec<&str> {
        self.patterned
            .iter()
            .map(|&i| &self.entries[i])
            .filter(|e| e.matches(type_name))
            .map(|e| e.name.as_str())
            .collect()
    }
}

/// Check if a column type needs the host's complex-type handling.
pub fn is_complex_type(type_name: &str) -> bool {
    COMPLEX_TYPES.iter().any(|t| {
        type_name == *t
            || type_name
                .strip_prefix(t)
                .is_some_and(|rest| rest.starts_with('('))
    })
}

/// Result of resolving one column type: scan shape, field type and converter.
///
/// The unsupported binding has no field type, no scan shape and no converter;
/// callers must check [`Binding::is_supported`] and skip the column, treat it
/// as opaque, or fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binding<'a> {
    entry: Option<&'a TypeEntry>,
}

impl<'a> Binding<'a> {
    fn from_entry(entry: &'a TypeEntry) -> Self {
        Self { entry: Some(entry) }
    }

    /// The binding returned for types no entry matches.
    pub fn unsupported() -> Self {
        Self { entry: None }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.entry.is_some()
    }

    /// Name of the matched entry.
    pub fn name(&self) -> Option<&'a str> {
        self.entry.map(|e| e.name.as_str())
    }

    pub fn field_type(&self) -> Option<FieldType> {
        self.entry.map(|e| e.field_type)
    }

    pub fn scan_shape(&self) -> Option<ScanShape> {
        self.entry.map(|e| e.scan_shape)
    }

    /// Converter that will run, `None` for the unsupported binding.
    pub fn converter_name(&self) -> Option<&'static str> {
        self.entry
            .map(|e| e.converter.map_or("unwrap", |c| c.name))
    }

    /// Convert one scanned cell.
    pub fn convert(&self, value: ScanValue) -> Result<FieldValue> {
        let Some(entry) = self.entry else {
            return Err(FrameError::Unbound);
        };
        match entry.converter {
            Some(converter) => converter.convert(value),
            None => convert::unwrap(entry.scan_shape, entry.field_type, value),
        }
    }

    /// Serializable description of this binding.
    pub fn summary(&self) -> BindingSummary {
        BindingSummary {
            entry: self.name().map(str::to_string),
            pattern: self
                .entry
                .and_then(|e| e.pattern.as_ref())
                .map(|re| re.as_str().to_string()),
            field_type: self.field_type(),
            scan_shape: self.scan_shape(),
            converter: self.converter_name(),
        }
    }
}

/// Owned, serializable view of a [`Binding`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingSummary {
    pub entry: Option<String>,
    pub pattern: Option<String>,
    pub field_type: Option<FieldType>,
    pub scan_shape: Option<ScanShape>,
    pub converter: Option<&'static str>,
}
