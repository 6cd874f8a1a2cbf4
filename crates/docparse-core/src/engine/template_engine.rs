//! Template engine: page text from PDF, text, or image documents, matched
//! against template rules.

use std::fs;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{DocumentKind, ParseEngine, ParseOutput, ParseRequest, Result, match_page};
use crate::error::{OcrError, ParseError};
use crate::models::config::OcrConfig;
use crate::ocr::{TextRecognizer, default_recognizer, scale_to_dpi};
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::template::TemplateSet;

/// Page separator in text documents.
const FORM_FEED: char = '\u{0C}';

/// Parsing engine driven by template field rules.
pub struct TemplateEngine {
    ocr_config: OcrConfig,
    recognizer: Option<Box<dyn TextRecognizer + Send + Sync>>,
}

impl TemplateEngine {
    /// Create an engine that loads OCR models from `ocr_config` on demand.
    pub fn new(ocr_config: OcrConfig) -> Self {
        Self {
            ocr_config,
            recognizer: None,
        }
    }

    /// Use a specific recognizer instead of the configured models.
    pub fn with_recognizer(mut self, recognizer: Box<dyn TextRecognizer + Send + Sync>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    fn recognize(&self, image: &image::DynamicImage) -> std::result::Result<String, OcrError> {
        match &self.recognizer {
            Some(recognizer) => recognizer.recognize(image),
            None => default_recognizer(&self.ocr_config)?.recognize(image),
        }
    }

    /// Text of every page of the document.
    fn load_pages(&self, request: &ParseRequest) -> Result<Vec<String>> {
        match DocumentKind::from_path(&request.document)? {
            DocumentKind::Text => {
                let text = String::from_utf8(fs::read(&request.document)?)?;
                let text = text.strip_suffix(FORM_FEED).unwrap_or(&text);
                Ok(text.split(FORM_FEED).map(str::to_string).collect())
            }
            DocumentKind::Pdf => self.load_pdf_pages(request),
            DocumentKind::Image => {
                if !request.ocr {
                    return Err(ParseError::OcrRequired);
                }
                let image = image::open(&request.document).map_err(OcrError::from)?;
                Ok(vec![self.recognize(&image)?])
            }
        }
    }

    fn load_pdf_pages(&self, request: &ParseRequest) -> Result<Vec<String>> {
        let data = fs::read(&request.document)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;

        let mut pages = extractor.extract_pages()?;
        let index = request.page_index as usize;

        let needs_ocr = request.ocr && pages.get(index).is_some_and(|text| text.trim().is_empty());
        if needs_ocr {
            info!("Page {} has no embedded text, running OCR", request.page_index);
            let image = extractor
                .extract_page_image(request.page_index)?
                .ok_or(OcrError::NoImage(request.page_index))?;
            let image = scale_to_dpi(image, extractor.page_width(request.page_index), request.dpi);
            pages[index] = self.recognize(&image)?;
        }

        Ok(pages)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl ParseEngine for TemplateEngine {
    fn parse(&self, request: &ParseRequest, templates: &TemplateSet) -> Result<ParseOutput> {
        let start = Instant::now();

        let pages = self.load_pages(request)?;
        let page_count = pages.len() as u32;
        debug!("Loaded {} page(s) from {}", page_count, request.document.display());

        if request.page_index >= page_count {
            warn!(
                "Requested page index {} but document has {} page(s)",
                request.page_index, page_count
            );
        }

        let fields: Vec<_> = pages
            .iter()
            .enumerate()
            .flat_map(|(index, text)| match_page(text, index as u32, templates))
            .collect();

        debug!("Engine found {} field(s) across all pages", fields.len());

        Ok(ParseOutput {
            fields,
            page_count,
            elapsed: start.elapsed(),
        })
    }
}
