//! Area classification.

use crate::models::field::{Area, FieldType};

/// Separator between table cell texts.
pub const TABLE_CELL_SEPARATOR: char = '\t';

/// Map a parsed area to its field type and flattened value.
///
/// Total over every variant; areas the report cannot represent become
/// `(Unknown, "")`.
pub fn classify(area: &Area) -> (FieldType, String) {
    match area {
        Area::Text(text) => (FieldType::Text, text.clone()),
        Area::Table(cells) => {
            let mut value = String::new();
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    value.push(TABLE_CELL_SEPARATOR);
                }
                value.push_str(&cell.text);
            }
            (FieldType::Table, value)
        }
        Area::Barcode(value) => (FieldType::Barcode, value.clone()),
        Area::Other { .. } => (FieldType::Unknown, String::new()),
    }
}
