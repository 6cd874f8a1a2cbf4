//! Document parsing engines.
//!
//! An engine turns a document plus a [`TemplateSet`] into a flat list of
//! [`RawField`]s. Filtering those fields down to one page is not the engine's
//! job; see [`crate::extraction::project`].

mod matcher;
mod template_engine;

pub use matcher::{match_field, match_page};
pub use template_engine::TemplateEngine;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ParseError;
use crate::models::config::DEFAULT_DPI;
use crate::models::field::RawField;
use crate::template::TemplateSet;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// What to parse and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRequest {
    /// Input document.
    pub document: PathBuf,
    /// Zero-based page the caller is interested in.
    pub page_index: u32,
    /// Run OCR on the requested page when it carries no text.
    pub ocr: bool,
    /// Rendering resolution for OCR.
    pub dpi: u32,
}

impl ParseRequest {
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            page_index: 0,
            ocr: false,
            dpi: DEFAULT_DPI,
        }
    }

    pub fn with_page_index(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }

    pub fn with_ocr(mut self, ocr: bool) -> Self {
        self.ocr = ocr;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Fields produced by one parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Every field found, on every page, in page order.
    pub fields: Vec<RawField>,
    /// Number of pages in the document.
    pub page_count: u32,
    /// Time the engine spent parsing.
    pub elapsed: Duration,
}

/// A document parsing engine.
pub trait ParseEngine {
    /// Parse `request.document` against the merged templates.
    fn parse(&self, request: &ParseRequest, templates: &TemplateSet) -> Result<ParseOutput>;
}

/// Document formats the template engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// PDF with embedded text, optionally OCR'd.
    Pdf,
    /// UTF-8 text, pages separated by form feeds.
    Text,
    /// A single scanned page.
    Image,
}

impl DocumentKind {
    /// Detect the document kind from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" => Ok(Self::Text),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" => Ok(Self::Image),
            _ => Err(ParseError::UnsupportedFormat(extension)),
        }
    }
}
