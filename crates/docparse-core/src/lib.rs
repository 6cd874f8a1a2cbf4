//! Core library for template-driven document field extraction.
//!
//! This crate provides:
//! - XML extraction templates merged into one field namespace
//! - A parsing engine for PDF, text, and scanned image documents
//! - Field projection onto a single requested page
//! - Structured (JSON) and plain-text report rendering

pub mod engine;
pub mod error;
pub mod extraction;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod report;
pub mod template;

pub use engine::{ParseEngine, ParseOutput, ParseRequest, TemplateEngine};
pub use error::{DocparseError, OcrError, ParseError, PdfError, Result, TemplateError};
pub use extraction::{Projection, Statistics, classify, project};
pub use models::{Area, DocparseConfig, FieldResult, FieldType, RawField, TableCell};
pub use report::{ReportFormat, ReportMetadata, render, write_report};
pub use template::{Template, TemplateField, TemplateSet};
