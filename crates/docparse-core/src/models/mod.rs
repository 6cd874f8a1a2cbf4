//! Data models.

pub mod config;
pub mod field;

pub use config::DocparseConfig;
pub use field::{Area, FieldResult, FieldType, RawField, TableCell};
