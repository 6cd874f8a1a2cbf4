//! Error types for the docparse-core library.
//!
//! Field projection and report rendering never fail; everything here belongs
//! to the collaborators around them (template loading, document parsing,
//! OCR, and the output sink).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the docparse library.
#[derive(Error, Debug)]
pub enum DocparseError {
    /// Template loading error.
    #[error("template error")]
    Template(#[from] TemplateError),

    /// Document parsing error.
    #[error("parse error")]
    Parse(#[from] ParseError),

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while loading a template file.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML is malformed.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// An element the template format does not define.
    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),

    /// A required attribute is missing.
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: String },

    /// A `field` declared both or neither of `pattern` and `label`.
    #[error("field `{0}` must declare exactly one of `pattern` or `label`")]
    AmbiguousRule(String),

    /// A regular expression failed to compile.
    #[error("invalid pattern for `{field}`")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A field name appears twice in the same template.
    #[error("duplicate field name `{0}`")]
    DuplicateField(String),

    /// The template declares no fields.
    #[error("template `{0}` declares no fields")]
    Empty(String),
}

/// Errors reported by a parsing engine.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input document could not be read.
    #[error("failed to read document")]
    Io(#[from] std::io::Error),

    /// The document's extension is not one the engine understands.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Image documents carry no text without OCR.
    #[error("image documents require OCR (pass --ocr)")]
    OcrRequired,

    /// PDF processing failed.
    #[error("PDF error")]
    Pdf(#[from] PdfError),

    /// OCR failed.
    #[error("OCR error")]
    Ocr(#[from] OcrError),

    /// The document is not valid UTF-8 text.
    #[error("document is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The crate was built without OCR support.
    #[error("OCR support is not compiled in (enable the `ocr` feature)")]
    Unavailable,

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The page has no image to recognize.
    #[error("no image found on page {0}")]
    NoImage(u32),

    /// The image could not be decoded.
    #[error("invalid image")]
    InvalidImage(#[from] image::ImageError),
}

impl OcrError {
    /// True when the failure is about the OCR setup rather than the document.
    pub fn is_setup(&self) -> bool {
        matches!(self, OcrError::ModelLoad(_) | OcrError::Unavailable)
    }
}

/// Result type for the docparse library.
pub type Result<T> = std::result::Result<T, DocparseError>;
