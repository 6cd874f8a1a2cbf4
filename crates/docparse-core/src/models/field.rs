//! Parsed field and projected field result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content area a parsed field occupies on its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Area {
    /// A run of text.
    Text(String),
    /// A table, cells in row-major order.
    Table(Vec<TableCell>),
    /// A decoded barcode payload.
    Barcode(String),
    /// Content the engine recognized but cannot represent.
    Other {
        /// Engine-specific name of the area kind.
        kind: String,
    },
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Cell text.
    pub text: String,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One field instance produced by a parsing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Template field name.
    pub name: String,
    /// Zero-based page index.
    pub page_index: u32,
    /// Content of the field.
    pub area: Area,
}

impl RawField {
    pub fn new(name: impl Into<String>, page_index: u32, area: Area) -> Self {
        Self {
            name: name.into(),
            page_index,
            area,
        }
    }
}

/// Classification of a projected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Table,
    Barcode,
    Unknown,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Table => "Table",
            FieldType::Barcode => "Barcode",
            FieldType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template field matched on the requested page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResult {
    /// Template field name.
    pub name: String,
    /// Zero-based page index.
    pub page_index: u32,
    /// Flattened field value.
    pub value: String,
    /// Kind of area the value came from.
    pub field_type: FieldType,
}
