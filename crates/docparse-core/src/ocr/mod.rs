//! OCR for scanned pages and image documents.

#[cfg(feature = "ocr")]
mod pure_engine;

#[cfg(feature = "ocr")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::pdf::POINTS_PER_INCH;

/// Turns a page image into text.
pub trait TextRecognizer {
    /// Recognize the text of an image, lines in reading order.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Build the default recognizer from configured model files.
#[cfg(feature = "ocr")]
pub fn default_recognizer(config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    Ok(Box::new(PureOcrEngine::from_config(config)?))
}

/// Build the default recognizer from configured model files.
#[cfg(not(feature = "ocr"))]
pub fn default_recognizer(_config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    Err(OcrError::Unavailable)
}

/// Largest edge accepted after rescaling.
const MAX_RENDER_EDGE: u32 = 16_384;

/// Rescale a page image so its width matches the page width at `dpi`.
///
/// Images are returned unchanged when the page width is unknown.
pub fn scale_to_dpi(image: DynamicImage, page_width_pt: Option<f32>, dpi: u32) -> DynamicImage {
    let Some(width_pt) = page_width_pt.filter(|w| *w > 0.0) else {
        return image;
    };
    if image.width() == 0 || image.height() == 0 {
        return image;
    }

    let target_width = (width_pt * dpi as f32 / POINTS_PER_INCH).round() as u32;
    let target_width = target_width.clamp(1, MAX_RENDER_EDGE);
    let scale = target_width as f32 / image.width() as f32;
    let target_height = ((image.height() as f32 * scale).round() as u32).clamp(1, MAX_RENDER_EDGE);

    if (target_width, target_height) == (image.width(), image.height()) {
        return image;
    }

    debug!(
        "Rescaling page image {}x{} -> {}x{} for {} DPI",
        image.width(),
        image.height(),
        target_width,
        target_height,
        dpi
    );
    image.resize_exact(target_width, target_height, FilterType::Triangle)
}
